//! SecretStore - ordered provider chain
//!
//! Tries each provider in turn and returns the first non-empty value.

use tracing::debug;

use crate::{EnvProvider, FileProvider, Provider, SecretsError};

pub struct SecretStore {
    providers: Vec<Box<dyn Provider>>,
}

impl SecretStore {
    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// The standard chain for store credentials: secret mounts first,
    /// environment variables as fallback.
    pub fn mongodb_auth() -> Self {
        Self::new(vec![
            Box::new(FileProvider::mongodb_auth()),
            Box::new(EnvProvider::new()),
        ])
    }

    /// Resolve a key through the provider chain.
    pub async fn get(&self, key: &str) -> Result<String, SecretsError> {
        for provider in &self.providers {
            match provider.get(key).await {
                Ok(value) => {
                    debug!(provider = provider.name(), key, "resolved secret");
                    return Ok(value);
                }
                Err(SecretsError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(SecretsError::NotFound(key.to_string()))
    }

    /// Resolve a key, returning `None` instead of a not-found error.
    pub async fn get_optional(&self, key: &str) -> Result<Option<String>, SecretsError> {
        match self.get(key).await {
            Ok(value) => Ok(Some(value)),
            Err(SecretsError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn falls_through_to_later_provider() {
        let empty = tempfile::tempdir().unwrap();
        let mount = tempfile::tempdir().unwrap();
        std::fs::write(mount.path().join("CHAINED"), "mounted").unwrap();

        let store = SecretStore::new(vec![
            Box::new(FileProvider::new(vec![empty.path().to_path_buf()])),
            Box::new(FileProvider::new(vec![mount.path().to_path_buf()])),
        ]);

        assert_eq!(store.get("CHAINED").await.unwrap(), "mounted");
    }

    #[tokio::test]
    async fn missing_everywhere_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SecretStore::new(vec![Box::new(FileProvider::new(vec![
            dir.path().to_path_buf(),
        ]))]);

        assert!(matches!(
            store.get("NOWHERE").await,
            Err(SecretsError::NotFound(_))
        ));
        assert!(store.get_optional("NOWHERE").await.unwrap().is_none());
    }
}
