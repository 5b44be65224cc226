use std::net::IpAddr;
use std::ops::RangeInclusive;

use crate::config::EnvironmentProvider;
use crate::config::errors::ConfigError;

/// One environment variable with a fallback used when it is unset
///
/// Typed accessors trim the raw value and report failures against the
/// variable name.
pub struct Setting<'a> {
    env: &'a dyn EnvironmentProvider,
    name: &'static str,
    fallback: &'static str,
}

impl<'a> Setting<'a> {
    pub fn new(env: &'a dyn EnvironmentProvider, name: &'static str, fallback: &'static str) -> Self {
        Self { env, name, fallback }
    }

    fn raw(&self) -> String {
        self.env
            .get_var(self.name)
            .unwrap_or_else(|| self.fallback.to_string())
    }

    fn invalid(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::Invalid {
            name: self.name,
            reason: reason.into(),
        }
    }

    /// Non-empty text
    pub fn text(&self) -> Result<String, ConfigError> {
        let value = self.raw().trim().to_string();
        if value.is_empty() {
            return Err(self.invalid("must not be empty"));
        }
        Ok(value)
    }

    pub fn integer(&self, range: RangeInclusive<i64>) -> Result<i64, ConfigError> {
        let raw = self.raw();
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| self.invalid(format!("expected an integer, got '{}'", raw)))?;
        if !range.contains(&value) {
            return Err(self.invalid(format!(
                "{} is outside {}..={}",
                value,
                range.start(),
                range.end()
            )));
        }
        Ok(value)
    }

    pub fn port(&self) -> Result<u16, ConfigError> {
        let value = self.integer(1..=i64::from(u16::MAX))?;
        u16::try_from(value).map_err(|_| self.invalid("port out of range"))
    }

    pub fn flag(&self) -> Result<bool, ConfigError> {
        let raw = self.raw();
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(self.invalid(format!("expected a boolean, got '{}'", raw))),
        }
    }

    /// IP literal (optionally bracketed) or a hostname without whitespace
    pub fn host(&self) -> Result<String, ConfigError> {
        let value = self.text()?;
        let unbracketed = value.trim_start_matches('[').trim_end_matches(']');
        if unbracketed.parse::<IpAddr>().is_ok() {
            return Ok(unbracketed.to_string());
        }
        if value.contains([':', '[', ']']) || value.chars().any(char::is_whitespace) {
            return Err(self.invalid(format!("'{}' is not a host name or address", value)));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_env_value_beats_fallback() {
        let env = MockEnvironment::empty().with_var("PORT", "9000");
        assert_eq!(Setting::new(&env, "PORT", "8080").port().unwrap(), 9000);
        assert_eq!(Setting::new(&env, "HOST", "0.0.0.0").host().unwrap(), "0.0.0.0");
    }

    #[test]
    fn test_integer_range_is_inclusive() {
        let env = MockEnvironment::empty().with_vars(&[("A", "720"), ("B", "721"), ("C", "soon")]);
        assert_eq!(Setting::new(&env, "A", "1").integer(1..=720).unwrap(), 720);
        assert!(Setting::new(&env, "B", "1").integer(1..=720).is_err());
        match Setting::new(&env, "C", "1").integer(1..=720) {
            Err(ConfigError::Invalid { name, .. }) => assert_eq!(name, "C"),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_port_zero_rejected() {
        let env = MockEnvironment::empty().with_var("PORT", "0");
        assert!(Setting::new(&env, "PORT", "8080").port().is_err());
    }

    #[test]
    fn test_flag_spellings() {
        let env = MockEnvironment::empty().with_vars(&[("ON", "Yes"), ("OFF", "0"), ("BAD", "sometimes")]);
        assert!(Setting::new(&env, "ON", "false").flag().unwrap());
        assert!(!Setting::new(&env, "OFF", "true").flag().unwrap());
        assert!(Setting::new(&env, "BAD", "true").flag().is_err());
    }

    #[test]
    fn test_host_forms() {
        let env = MockEnvironment::empty().with_vars(&[("V6", "[::1]"), ("NAME", "localhost"), ("BAD", "bad host")]);
        assert_eq!(Setting::new(&env, "V6", "").host().unwrap(), "::1");
        assert_eq!(Setting::new(&env, "NAME", "").host().unwrap(), "localhost");
        assert!(Setting::new(&env, "BAD", "").host().is_err());
        assert!(Setting::new(&env, "EMPTY", "").host().is_err());
    }
}
