//! Durable key-value storage.
//!
//! The session store mirrors its token into one of these backends so it
//! survives restarts of the client. Only a handful of string entries are ever
//! written, so every backend works on whole values.

pub mod file;
pub mod keychain;
pub mod memory;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FileStorage;
pub use keychain::KeychainStorage;
pub use memory::MemoryStorage;

/// Keychain service name used by the keyring backend
pub const KEYCHAIN_SERVICE: &str = "voltdesk";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt storage file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),
}

/// A string-to-string store that outlives the process.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a key that is not present is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Which backend holds the durable entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

/// Open the configured backend. `data_dir` is only used by the file backend.
pub fn open(backend: StorageBackend, data_dir: &Path) -> Box<dyn KeyValueStore> {
    match backend {
        StorageBackend::File => Box::new(FileStorage::in_dir(data_dir)),
        StorageBackend::Keyring => Box::new(KeychainStorage::new(KEYCHAIN_SERVICE)),
        StorageBackend::Memory => Box::new(MemoryStorage::default()),
    }
}
