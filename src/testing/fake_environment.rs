use std::collections::HashMap;

use crate::domain::AppError;
use crate::ports::EnvironmentReader;

/// In-memory environment for tests.
#[derive(Debug, Default)]
pub struct FakeEnvironment {
    vars: HashMap<String, String>,
}

impl FakeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvironmentReader for FakeEnvironment {
    fn var(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.vars.get(key).cloned())
    }
}
