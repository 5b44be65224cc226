use thiserror::Error;

/// Startup configuration failures; fatal before the server binds
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("setting {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("secret {name} is not set")]
    MissingSecret { name: &'static str },

    #[error("secret {name} must be at least {min} characters, got {actual}")]
    ShortSecret {
        name: &'static str,
        min: usize,
        actual: usize,
    },
}
