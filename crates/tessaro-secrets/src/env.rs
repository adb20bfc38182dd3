//! Environment variable secrets provider

use async_trait::async_trait;
use std::env;

use crate::{Provider, SecretsError};

/// Environment variable secrets provider. Keys are looked up verbatim.
pub struct EnvProvider;

impl EnvProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for EnvProvider {
    async fn get(&self, key: &str) -> Result<String, SecretsError> {
        match env::var(key) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(SecretsError::NotFound(key.to_string())),
        }
    }

    fn name(&self) -> &str {
        "env"
    }
}
