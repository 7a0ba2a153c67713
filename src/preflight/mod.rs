//! Environment validation that runs before any side effect.
//!
//! Publishing is requested by the mere presence of `MANUAL_PUBLISH` (or the
//! `--publish` flag) and then needs a GitHub token. Both are read once into an
//! [`EnvSnapshot`] so the gate itself is pure.

use crate::error::CliError;
use std::fmt;

/// Presence of this variable requests publishing. Its value is ignored.
pub const MANUAL_PUBLISH_ENV: &str = "MANUAL_PUBLISH";

/// Token used to clone and push the tap.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// The publishing-related parts of the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// `MANUAL_PUBLISH` is set (to anything, including empty).
    pub manual_publish: bool,
    /// Value of `GITHUB_TOKEN`, if set and valid UTF-8.
    pub github_token: Option<String>,
}

impl EnvSnapshot {
    /// Reads the snapshot from the current process environment.
    pub fn capture() -> Self {
        Self {
            manual_publish: std::env::var_os(MANUAL_PUBLISH_ENV).is_some(),
            github_token: std::env::var(GITHUB_TOKEN_ENV).ok(),
        }
    }
}

/// Token for the tap remote. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Outcome of the publish gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishMode {
    /// Package only.
    Skip,
    /// Package, then publish the formula with this credential.
    Publish(Credential),
}

/// Decides whether this run publishes.
///
/// `force_publish` is the `--publish` flag; `token_override` is an explicit
/// token from the command line, which wins over the environment. An empty
/// token counts as missing.
///
/// # Errors
///
/// [`CliError::MissingCredential`] when publishing is requested without a token.
pub fn check_publish_env(
    env: &EnvSnapshot,
    force_publish: bool,
    token_override: Option<&str>,
) -> Result<PublishMode, CliError> {
    if !(env.manual_publish || force_publish) {
        return Ok(PublishMode::Skip);
    }

    let token = token_override
        .or(env.github_token.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match token {
        Some(token) => Ok(PublishMode::Publish(Credential::new(token))),
        None => {
            log::error!(
                "Publishing requested but {} is not set",
                GITHUB_TOKEN_ENV
            );
            Err(CliError::MissingCredential {
                variable: GITHUB_TOKEN_ENV.to_string(),
                reason: format!(
                    "publishing was requested ({MANUAL_PUBLISH_ENV} or --publish) but no token was provided"
                ),
            })
        }
    }
}
