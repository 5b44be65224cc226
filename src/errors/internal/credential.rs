use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token subject does not match any user")]
    UnknownUser,

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),

    #[error("Stored password hash is unreadable: {0}")]
    CorruptHash(String),
}
