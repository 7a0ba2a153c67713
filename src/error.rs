//! Application-level error types.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for a release run
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument and environment errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON manifest errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML manifest errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Packaging and publishing errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Required credential absent from the environment
    #[error("Missing credential {variable}: {reason}")]
    MissingCredential {
        /// Environment variable that should hold it
        variable: String,
        /// Why it is needed
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as BundlerError;

        match self {
            ReleaseError::Cli(CliError::MissingCredential { variable, .. }) => vec![
                format!("export {variable}=<token with push access to the tap>"),
                "or unset MANUAL_PUBLISH to package without publishing".to_string(),
            ],
            ReleaseError::Bundler(BundlerError::ToolNotFound(tool)) => vec![
                format!("Install `{tool}` and make sure it is on PATH"),
                "or pass --archiver builtin to archive without external tools".to_string(),
            ],
            ReleaseError::Bundler(BundlerError::Packaging { source, .. })
                if matches!(**source, BundlerError::MissingBinary { .. }) =>
            {
                vec!["Build the standalone binaries into the working directory first".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
