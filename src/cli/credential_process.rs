//! credential_process command implementation
//!
//! Prints exactly one JSON object on stdout:
//! `{"Version":1,"AccessKeyId":..,"SecretAccessKey":..,"SessionToken":..,"Expiration":..}`

use bwsts_core::config::Config;
use bwsts_core::error::BwstsError;
use bwsts_core::pipeline::Pipeline;
use bwsts_core::sts::AwsStsIssuer;
use bwsts_core::vault::BitwardenCli;
use chrono::Utc;
use tracing::debug;

pub fn run_credential_process(no_cache: bool) -> Result<(), BwstsError> {
    let config = Config::load()?;

    let outcome = Pipeline::new(&config).use_cache(!no_cache).run(
        Utc::now(),
        || Ok(BitwardenCli::from_config(&config)?),
        || Ok(AwsStsIssuer::from_config(&config)?),
    )?;
    debug!("Credentials source: {:?}", outcome.source);

    let json = serde_json::to_string(&outcome.credentials.to_process_output())?;
    println!("{}", json);

    Ok(())
}
