//! Key-value storage port.
//!
//! Every persisted value (history, usage window, theme) is a string stored
//! under a string key, the same shape as browser local storage. The stores
//! in this crate only talk to this trait.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::OracleResult;
#[cfg(test)]
use crate::error::OracleError;

/// String key-value persistence.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> OracleResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> OracleResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> OracleResult<()>;
}

/// Storage whose every call fails with an I/O error.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStorage;

#[cfg(test)]
impl FailingStorage {
    fn error() -> OracleError {
        std::io::Error::other("disk unavailable").into()
    }
}

#[cfg(test)]
impl Storage for FailingStorage {
    fn get(&self, _key: &str) -> OracleResult<Option<String>> {
        Err(Self::error())
    }

    fn set(&mut self, _key: &str, _value: &str) -> OracleResult<()> {
        Err(Self::error())
    }

    fn remove(&mut self, _key: &str) -> OracleResult<()> {
        Err(Self::error())
    }
}
