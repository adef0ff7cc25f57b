use std::cell::RefCell;
use std::collections::hash_map::{Entry as Slot, HashMap};

use keyring::Entry;

use super::{KeyValueStore, StorageError};

/// Entries stored in the OS keychain, one credential per key.
///
/// Each key's `Entry` is created once and reused, so every read and write for
/// a key goes through the same credential handle.
pub struct KeychainStorage {
    service: String,
    entries: RefCell<HashMap<String, Entry>>,
}

impl KeychainStorage {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
            entries: RefCell::new(HashMap::new()),
        }
    }

    fn with_entry<T>(
        &self,
        key: &str,
        f: impl FnOnce(&Entry) -> keyring::Result<T>,
    ) -> Result<keyring::Result<T>, StorageError> {
        let mut entries = self.entries.borrow_mut();
        let entry = match entries.entry(key.to_string()) {
            Slot::Occupied(slot) => slot.into_mut(),
            Slot::Vacant(slot) => slot.insert(Entry::new(&self.service, key)?),
        };
        Ok(f(entry))
    }
}

impl KeyValueStore for KeychainStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.with_entry(key, |e| e.get_password())? {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_entry(key, |e| e.set_password(value))??;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        match self.with_entry(key, |e| e.delete_credential())? {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
