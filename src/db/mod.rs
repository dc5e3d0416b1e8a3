//! Local durable key-value storage (the slot that remembers the logged-in user).

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::AppError;

/// Key names as constants.
pub mod keys {
    /// Serialized `User` record of the logged-in user
    pub const CURRENT_USER: &str = "vivafit_user";
}

/// Persistent string key-value store.
///
/// Values survive process restarts; operations are synchronous.
pub trait LocalStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}
