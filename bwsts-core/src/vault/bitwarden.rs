//! Bitwarden CLI (`bw`) vault
//!
//! Every operation is one blocking child process. The session key returned
//! by `bw unlock --raw` stays inside [`BitwardenCli`] and is handed to later
//! children through their own `BW_SESSION` variable; the parent process
//! environment is never modified.

use crate::config::{Config, VaultConfig};
use crate::error::VaultError;
use crate::types::MasterPassword;
use crate::vault::{SecretVault, VaultItem};
use secrecy::{ExposeSecret, Secret};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tracing::{debug, info};

const SESSION_ENV: &str = "BW_SESSION";

/// Variable the master password is passed through (`--passwordenv`), so it
/// never shows up in the process table
const PASSWORD_ENV: &str = "BWSTS_MASTER_PASSWORD";

pub struct BitwardenCli {
    binary: PathBuf,
    master_password: Option<MasterPassword>,
    session: Option<Secret<String>>,
}

impl BitwardenCli {
    /// Resolve `binary` (a name in PATH or a path) and prepare the client
    pub fn new(binary: &str, master_password: Option<MasterPassword>) -> Result<Self, VaultError> {
        let resolved = which::which(binary).map_err(|_| VaultError::CliNotFound {
            binary: binary.to_string(),
        })?;
        debug!("Using vault CLI at {}", resolved.display());

        Ok(Self {
            binary: resolved,
            master_password,
            session: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, VaultError> {
        Self::new(&config.bw_binary, config.master_password.clone())
    }

    pub fn from_vault_config(config: &VaultConfig) -> Result<Self, VaultError> {
        Self::new(&config.bw_binary, config.master_password.clone())
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(session) = &self.session {
            cmd.env(SESSION_ENV, session.expose_secret());
        }
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<Output, VaultError> {
        cmd.output().map_err(|e| VaultError::SpawnFailed {
            reason: format!("{}: {}", self.binary.display(), e),
        })
    }

    /// `bw unlock --check` exits zero when the vault is already unlocked
    pub fn is_unlocked(&self) -> Result<bool, VaultError> {
        let output = self.run(self.command(["unlock", "--check"]))?;
        Ok(output.status.success())
    }
}

impl SecretVault for BitwardenCli {
    fn unlock(&mut self) -> Result<(), VaultError> {
        if self.is_unlocked()? {
            debug!("Vault already unlocked");
            return Ok(());
        }

        let password = self.master_password.as_ref().ok_or(VaultError::Locked)?;

        let mut cmd = self.command(["unlock", "--passwordenv", PASSWORD_ENV, "--raw"]);
        cmd.env(PASSWORD_ENV, password.expose());
        let output = self.run(cmd)?;

        if !output.status.success() {
            return Err(VaultError::UnlockFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let session = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if session.is_empty() {
            return Err(VaultError::UnlockFailed {
                stderr: "unlock returned an empty session key".to_string(),
            });
        }

        self.session = Some(Secret::new(session));
        info!("Vault unlocked");
        Ok(())
    }

    fn get_item(&self, item_id: &str) -> Result<VaultItem, VaultError> {
        debug!("Fetching vault item {}", item_id);
        let output = self.run(self.command(["get", "item", item_id]))?;

        if !output.status.success() {
            return Err(VaultError::ItemFetchFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| VaultError::MalformedItem {
            reason: e.to_string(),
        })?;
        let item = VaultItem::from_json(&stdout)?;
        debug!(
            "Fetched vault item {}",
            item.name.as_deref().unwrap_or("(unnamed)")
        );
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary() {
        let result = BitwardenCli::new("bwsts-definitely-not-a-real-binary", None);
        assert!(matches!(result, Err(VaultError::CliNotFound { .. })));
    }
}
