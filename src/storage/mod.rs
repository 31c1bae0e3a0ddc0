//! Local key-value persistence.
//!
//! Values are JSON documents stored under browser-compatible keys, so a
//! profile exported from the web build can be dropped into the data
//! directory unchanged.

pub mod file_store;
pub mod memory;
pub mod state;

pub use file_store::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Internal lock error")]
    LockPoisoned,
}

/// String-valued key-value store with local-storage semantics.
///
/// Implementations use interior mutability so one handle can be shared
/// across the session.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
