//! In-memory vault
//!
//! Stands in for the password-manager CLI in tests and dry runs.

use crate::error::VaultError;
use crate::vault::{SecretVault, VaultItem};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryVault {
    items: HashMap<String, VaultItem>,
    locked: bool,
    has_password: bool,
    unlock_calls: usize,
    fetches: std::cell::Cell<usize>,
}

impl MemoryVault {
    /// An unlocked, empty vault
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item_id: &str, item: VaultItem) -> Self {
        self.items.insert(item_id.to_string(), item);
        self
    }

    /// Start locked; `has_password` decides whether unlocking succeeds
    pub fn locked(mut self, has_password: bool) -> Self {
        self.locked = true;
        self.has_password = has_password;
        self
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn unlock_calls(&self) -> usize {
        self.unlock_calls
    }

    /// Number of `get_item` calls, successful or not
    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl SecretVault for MemoryVault {
    fn unlock(&mut self) -> Result<(), VaultError> {
        self.unlock_calls += 1;
        if self.locked {
            if !self.has_password {
                return Err(VaultError::Locked);
            }
            self.locked = false;
        }
        Ok(())
    }

    fn get_item(&self, item_id: &str) -> Result<VaultItem, VaultError> {
        self.fetches.set(self.fetches.get() + 1);
        if self.locked {
            return Err(VaultError::ItemFetchFailed {
                stderr: "Vault is locked.".to_string(),
            });
        }
        self.items
            .get(item_id)
            .cloned()
            .ok_or_else(|| VaultError::ItemFetchFailed {
                stderr: "Not found.".to_string(),
            })
    }
}
