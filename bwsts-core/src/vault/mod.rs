//! Secret retrieval from an external password manager
//!
//! The pipeline only sees the [`SecretVault`] capability. The real
//! implementation shells out to the Bitwarden CLI; [`MemoryVault`] serves
//! tests without spawning processes.

use crate::error::VaultError;
use crate::types::OtpSecret;

pub mod bitwarden;
pub mod item;
pub mod memory;

pub use bitwarden::BitwardenCli;
pub use item::{Fido2Credential, VaultItem};
pub use memory::MemoryVault;

pub trait SecretVault {
    /// Make the vault readable: confirm an unlocked session or unlock it
    fn unlock(&mut self) -> Result<(), VaultError>;

    /// Fetch a whole item by id
    fn get_item(&self, item_id: &str) -> Result<VaultItem, VaultError>;

    /// Fetch one custom field of an item
    fn get_field(&self, item_id: &str, field_name: &str) -> Result<OtpSecret, VaultError> {
        self.get_item(item_id)?.field(field_name)
    }
}
