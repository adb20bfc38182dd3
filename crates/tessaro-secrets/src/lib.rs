//! Tessaro Secrets Management
//!
//! Resolves credentials from a chain of providers:
//! - Filesystem secret mounts (one file per key, Kubernetes-style)
//! - Environment variables
//!
//! The first provider that yields a non-empty value wins. Values are
//! trimmed; an empty file or variable counts as absent.

use async_trait::async_trait;
use thiserror::Error;

mod env;
mod file;
mod store;

pub use env::EnvProvider;
pub use file::FileProvider;
pub use store::SecretStore;

#[derive(Error, Debug)]
pub enum SecretsError {
    #[error("Secret not found: {0}")]
    NotFound(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Secrets provider trait
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get a secret by key. Returns `NotFound` when the key is absent or
    /// empty after trimming.
    async fn get(&self, key: &str) -> Result<String, SecretsError>;

    /// Provider name, for logging.
    fn name(&self) -> &str;
}
