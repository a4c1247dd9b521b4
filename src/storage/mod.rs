pub mod json_backend;
pub mod memory;
pub mod persistence;

use crate::errors::PersistenceError;

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Durable string slots addressed by key. Writes replace the whole value.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing has been stored under `key` yet.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Copies the stored value of `from` into `to` without decoding it.
    /// Missing sources are a no-op.
    fn copy(&self, from: &str, to: &str) -> Result<()> {
        if let Some(value) = self.get(from)? {
            self.set(to, &value)?;
        }
        Ok(())
    }
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
pub use persistence::{entry_warnings, LoadReport, Persistence, DEFAULT_SLOT_KEY};
