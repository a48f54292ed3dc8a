//! CLI command implementations
//!
//! This module contains the implementation of all CLI subcommands.

pub mod code;
pub mod credential_process;
pub mod fido2_probe;
