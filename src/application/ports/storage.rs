//! Durable key-value storage port

use async_trait::async_trait;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    #[error("Stored value for '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },
}

/// Port for small string values that survive restarts
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` if it was never written
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
