//! Local persisted state: a flat string key-value store standing in for the
//! browser's local storage.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use shared_models::error::AppError;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const USER_KEY: &str = "user";
pub const THEME_KEY: &str = "theme";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store file {path} is not a JSON object of strings")]
    Corrupt { path: String },
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
