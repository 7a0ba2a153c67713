//! Command line interface for the standalone release packager.
//!
//! This module wires argument parsing, the publish gate, manifest loading and
//! the release workflow together, with user feedback through
//! [`OutputManager`].

mod args;
pub mod commands;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, Result};
use crate::preflight::{EnvSnapshot, check_publish_env};

/// Main CLI entry point
///
/// The publish gate runs before the manifest is read or any command is
/// spawned, so a missing token leaves the working directory untouched.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let runtime_config = RuntimeConfig::from(&args);

    let mode = check_publish_env(
        &EnvSnapshot::capture(),
        args.publish,
        args.github_token.as_deref(),
    )?;

    let package = crate::metadata::load_manifest(&args.manifest)?;
    let settings = args.to_settings(package)?;
    log::debug!("Resolved settings: {:?}", settings);

    commands::release(settings, mode, &runtime_config).await
}
