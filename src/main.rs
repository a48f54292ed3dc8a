//! bwsts - AWS credential_process helper
//!
//! Reads a TOTP secret from Bitwarden, exchanges the current code for an
//! STS session token and prints it in the shape the AWS CLI expects from a
//! `credential_process` command.

use bwsts_core::{error::BwstsError, init_logging, LevelFilter};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::io::IsTerminal;

mod cli;

#[derive(Parser)]
#[command(name = "bwsts", version)]
#[command(about = "Bitwarden TOTP -> AWS STS session credentials for credential_process")]
struct Cli {
    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print session credentials as credential_process JSON (the default)
    CredentialProcess {
        /// Ignore cached credentials and request new ones
        #[arg(long)]
        no_cache: bool,
    },
    /// Print the current TOTP code
    Code,
    /// Look up the item's FIDO2 credential (STS cannot use it; always fails)
    Fido2Probe,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    if let Err(e) = init_logging(level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let command = cli
        .command
        .unwrap_or(Commands::CredentialProcess { no_cache: false });

    let result = match command {
        Commands::CredentialProcess { no_cache } => {
            cli::credential_process::run_credential_process(no_cache)
        }
        Commands::Code => cli::code::run_code(),
        Commands::Fido2Probe => cli::fido2_probe::run_fido2_probe(),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    }
}

fn report(error: &BwstsError) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {}", "error:".red().bold(), error);
    } else {
        eprintln!("error: {}", error);
    }
}
