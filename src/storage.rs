mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::app_error::AppError;

/// Durable string key-value storage, the client-side counterpart of browser
/// local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}
