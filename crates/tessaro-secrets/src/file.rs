//! Filesystem secret mount provider
//!
//! Reads one file per key from a list of mount directories, first match
//! wins. This is the shape Kubernetes secret volumes expose.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::{Provider, SecretsError};

/// Filesystem mount secrets provider
pub struct FileProvider {
    dirs: Vec<PathBuf>,
}

impl FileProvider {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The fixed mount locations for the MongoDB auth secret.
    pub fn mongodb_auth() -> Self {
        Self::new(vec![
            PathBuf::from("/secrets/mongodb-auth"),
            PathBuf::from("/secrets/default/mongodb-auth"),
        ])
    }
}

#[async_trait]
impl Provider for FileProvider {
    async fn get(&self, key: &str) -> Result<String, SecretsError> {
        for dir in &self.dirs {
            let path = dir.join(key);
            if !path.exists() {
                continue;
            }
            let value = std::fs::read_to_string(&path)?;
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }
        Err(SecretsError::NotFound(key.to_string()))
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_secret_from_first_matching_mount() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join("MONGO_USER"), "from-second\n").unwrap();

        let provider = FileProvider::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);

        assert_eq!(provider.get("MONGO_USER").await.unwrap(), "from-second");
    }

    #[tokio::test]
    async fn earlier_mount_shadows_later_one() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(first.path().join("KEY"), "primary").unwrap();
        std::fs::write(second.path().join("KEY"), "fallback").unwrap();

        let provider = FileProvider::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);

        assert_eq!(provider.get("KEY").await.unwrap(), "primary");
    }

    #[tokio::test]
    async fn empty_file_counts_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("EMPTY"), "   \n").unwrap();

        let provider = FileProvider::new(vec![dir.path().to_path_buf()]);
        assert!(matches!(
            provider.get("EMPTY").await,
            Err(SecretsError::NotFound(_))
        ));
    }
}
