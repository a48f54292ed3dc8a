//! FIDO2 probe (non-functional)
//!
//! Looks up the passkey stored on a vault item as if it could stand in for
//! the TOTP code. It cannot: `GetSessionToken` only accepts a six-digit
//! code from a virtual or hardware OTP device, and no STS API takes a
//! WebAuthn assertion. [`Fido2Probe::run`] therefore always ends in
//! [`RemoteServiceError::Unsupported`] once the credential is found.
//!
//! Kept apart from [`crate::pipeline`]; nothing there calls into this module.

use crate::error::{BwstsError, RemoteServiceError, VaultError};
use crate::vault::{Fido2Credential, SecretVault};
use tracing::info;

pub struct Fido2Probe<'a, V: SecretVault> {
    vault: &'a mut V,
    item_id: &'a str,
}

/// What the probe learned before giving up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fido2Summary {
    pub credential_id: String,
    pub rp_id: Option<String>,
    pub user_name: Option<String>,
}

impl From<&Fido2Credential> for Fido2Summary {
    fn from(credential: &Fido2Credential) -> Self {
        Self {
            credential_id: credential.credential_id.clone(),
            rp_id: credential.rp_id.clone(),
            user_name: credential.user_name.clone(),
        }
    }
}

impl<'a, V: SecretVault> Fido2Probe<'a, V> {
    pub fn new(vault: &'a mut V, item_id: &'a str) -> Self {
        Self { vault, item_id }
    }

    /// Unlock the vault and read the item's first FIDO2 credential
    pub fn find_credential(&mut self) -> Result<Fido2Summary, BwstsError> {
        self.vault.unlock()?;
        let item = self.vault.get_item(self.item_id)?;
        let credential = item
            .first_fido2_credential()
            .ok_or(VaultError::NoFido2Credential)?;
        Ok(Fido2Summary::from(credential))
    }

    /// Always fails; the error says why
    pub fn run(mut self) -> Result<Fido2Summary, BwstsError> {
        let summary = self.find_credential()?;
        info!(
            "Found FIDO2 credential {} for {}",
            summary.credential_id,
            summary.rp_id.as_deref().unwrap_or("unknown relying party")
        );

        Err(RemoteServiceError::Unsupported {
            reason: format!(
                "credential {} is a FIDO2/WebAuthn key; STS GetSessionToken only accepts TOTP codes",
                summary.credential_id
            ),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::{MemoryVault, VaultItem};

    #[test]
    fn test_probe_reports_unsupported() {
        let item = VaultItem::from_json(
            r#"{"login": {"fido2Credentials": [{"credentialId": "abc", "rpId": "aws.amazon.com"}]}}"#,
        )
        .unwrap();
        let mut vault = MemoryVault::new().with_item("item", item);

        let mut probe = Fido2Probe::new(&mut vault, "item");
        let summary = probe.find_credential().unwrap();
        assert_eq!(summary.credential_id, "abc");

        let err = Fido2Probe::new(&mut vault, "item").run().unwrap_err();
        assert!(matches!(
            err,
            BwstsError::Remote(RemoteServiceError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_probe_without_credential() {
        let mut vault = MemoryVault::new().with_item("item", VaultItem::default());
        let err = Fido2Probe::new(&mut vault, "item").run().unwrap_err();
        assert!(matches!(
            err,
            BwstsError::Vault(VaultError::NoFido2Credential)
        ));
    }
}
