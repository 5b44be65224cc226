#[cfg(test)]
use std::collections::HashMap;

/// Where settings and secrets are read from
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// The process environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed in-memory variables for unit tests
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MockEnvironment(HashMap<String, String>);

#[cfg(test)]
impl MockEnvironment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_var(self, key: &str, value: &str) -> Self {
        self.with_vars(&[(key, value)])
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        self.0
            .extend(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}
