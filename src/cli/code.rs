//! Code command implementation
//!
//! `bwsts code` prints the current TOTP code for manual use, e.g. the AWS
//! console sign-in page. No STS call is made.

use bwsts_core::config::Config;
use bwsts_core::error::BwstsError;
use bwsts_core::otp::totp;
use bwsts_core::pipeline::Pipeline;
use bwsts_core::vault::BitwardenCli;
use chrono::Utc;

/// Run the code command
///
/// Only the code goes to stdout; the remaining validity goes to stderr.
pub fn run_code() -> Result<(), BwstsError> {
    let config = Config::load()?;
    let mut vault = BitwardenCli::from_config(&config)?;

    let now = Utc::now();
    let code = Pipeline::new(&config).current_code(&mut vault, now)?;

    println!("{}", code.expose());
    eprintln!(
        "valid for {}s",
        totp::seconds_remaining(now.timestamp().max(0) as u64)
    );

    Ok(())
}
