//! Vault item JSON model
//!
//! Subset of the object printed by `bw get item <id>`. Only custom fields
//! and the login's FIDO2 credentials are read; everything else is ignored.

use crate::error::VaultError;
use crate::types::OtpSecret;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VaultItem {
    #[serde(default)]
    pub name: Option<String>,

    /// Custom fields; `bw` prints `null` or omits the key when there are none
    #[serde(default)]
    pub fields: Option<Vec<ItemField>>,

    #[serde(default)]
    pub login: Option<Login>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemField {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub value: Option<Secret<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Login {
    #[serde(default, rename = "fido2Credentials")]
    pub fido2_credentials: Option<Vec<Fido2Credential>>,
}

/// Passkey stored on a login item
///
/// Only identifying data is kept; the private key in `keyValue` is never
/// deserialized.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fido2Credential {
    pub credential_id: String,

    #[serde(default)]
    pub rp_id: Option<String>,

    #[serde(default)]
    pub user_name: Option<String>,
}

impl VaultItem {
    /// Parse `bw get item` output
    pub fn from_json(json: &str) -> Result<Self, VaultError> {
        serde_json::from_str(json).map_err(|e| VaultError::MalformedItem {
            reason: e.to_string(),
        })
    }

    /// Build an item holding only custom fields
    pub fn with_fields<I, N, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: Some(
                fields
                    .into_iter()
                    .map(|(name, value)| ItemField {
                        name: Some(name.into()),
                        value: Some(Secret::new(value.into())),
                    })
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Value of the first custom field called `name`
    ///
    /// A field that exists but has no value counts as missing.
    pub fn field(&self, name: &str) -> Result<OtpSecret, VaultError> {
        self.fields
            .iter()
            .flatten()
            .find(|f| f.name.as_deref() == Some(name))
            .and_then(|f| f.value.as_ref())
            .map(|v| OtpSecret::new(v.expose_secret().clone()))
            .ok_or_else(|| VaultError::FieldNotFound {
                name: name.to_string(),
            })
    }

    /// First FIDO2 credential on the login, if any
    pub fn first_fido2_credential(&self) -> Option<&Fido2Credential> {
        self.login
            .as_ref()
            .and_then(|login| login.fido2_credentials.as_ref())
            .and_then(|creds| creds.first())
    }
}
