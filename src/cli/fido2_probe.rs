//! fido2-probe command implementation
//!
//! Exploratory only; see `bwsts_core::fido2`. Exits non-zero every time.
//! Needs only the vault settings, not the MFA serial or profile.

use bwsts_core::config::VaultConfig;
use bwsts_core::error::BwstsError;
use bwsts_core::fido2::Fido2Probe;
use bwsts_core::vault::BitwardenCli;

pub fn run_fido2_probe() -> Result<(), BwstsError> {
    let config = VaultConfig::load()?;
    let mut vault = BitwardenCli::from_vault_config(&config)?;

    Fido2Probe::new(&mut vault, &config.item_id).run()?;
    Ok(())
}
