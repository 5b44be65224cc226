use std::fmt;

use crate::config::EnvironmentProvider;
use crate::config::errors::ConfigError;

const JWT_SECRET: &str = "JWT_SECRET";
const PASSWORD_PEPPER: &str = "PASSWORD_PEPPER";

/// HMAC key for bearer tokens and the pepper mixed into password hashes
///
/// Both are required and have a minimum length; neither has a default.
pub struct Secrets {
    jwt_secret: String,
    password_pepper: String,
}

impl Secrets {
    pub fn load(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        Ok(Self {
            jwt_secret: required(env, JWT_SECRET, 32)?,
            password_pepper: required(env, PASSWORD_PEPPER, 16)?,
        })
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }
}

fn required(env: &dyn EnvironmentProvider, name: &'static str, min: usize) -> Result<String, ConfigError> {
    let value = env
        .get_var(name)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingSecret { name })?;
    if value.len() < min {
        return Err(ConfigError::ShortSecret {
            name,
            min,
            actual: value.len(),
        });
    }
    Ok(value)
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    const JWT: &str = "this-is-a-valid-jwt-secret-with-32-characters";
    const PEPPER: &str = "valid-pepper-16ch";

    fn load(vars: &[(&str, &str)]) -> Result<Secrets, ConfigError> {
        Secrets::load(&MockEnvironment::empty().with_vars(vars))
    }

    #[test]
    fn test_loads_both_secrets() {
        let secrets = load(&[(JWT_SECRET, JWT), (PASSWORD_PEPPER, PEPPER)]).unwrap();
        assert_eq!(secrets.jwt_secret(), JWT);
        assert_eq!(secrets.password_pepper(), PEPPER);
    }

    #[test]
    fn test_missing_secret_is_named() {
        match load(&[(PASSWORD_PEPPER, PEPPER)]) {
            Err(ConfigError::MissingSecret { name }) => assert_eq!(name, JWT_SECRET),
            other => panic!("expected MissingSecret, got {:?}", other),
        }
        match load(&[(JWT_SECRET, JWT), (PASSWORD_PEPPER, "")]) {
            Err(ConfigError::MissingSecret { name }) => assert_eq!(name, PASSWORD_PEPPER),
            other => panic!("expected MissingSecret, got {:?}", other),
        }
    }

    #[test]
    fn test_short_jwt_secret() {
        match load(&[(JWT_SECRET, "short-secret"), (PASSWORD_PEPPER, PEPPER)]) {
            Err(ConfigError::ShortSecret { name, min, actual }) => {
                assert_eq!((name, min, actual), (JWT_SECRET, 32, 12));
            }
            other => panic!("expected ShortSecret, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts() {
        let secrets = load(&[(JWT_SECRET, JWT), (PASSWORD_PEPPER, PEPPER)]).unwrap();
        let debug = format!("{:?}", secrets);
        assert!(!debug.contains(JWT));
        assert!(!debug.contains(PEPPER));
    }
}
