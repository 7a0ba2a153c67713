//! Error types for packaging and publishing operations.
//!
//! Library-layer errors carry the failing command, path or platform so the
//! top-level handler can print something actionable without extra context.

use super::platform::Platform;
use std::{fmt::Display, path::PathBuf, process::ExitStatus};
use thiserror::Error;

/// Result alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while packaging platform binaries or publishing a formula.
#[derive(Error, Debug)]
pub enum Error {
    /// Free-form error raised through [`bail!`](crate::bail) or [`Context`].
    #[error("{0}")]
    GenericError(String),

    /// Filesystem operation failed on a known path.
    #[error("failed {context} `{}`: {error}", .path.display())]
    Fs {
        /// What was being attempted (e.g. "creating scratch directory").
        context: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        error: std::io::Error,
    },

    /// An external command could not be started.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command line (credentials redacted).
        command: String,
        /// Spawn or wait error.
        error: std::io::Error,
    },

    /// An external command ran and exited unsuccessfully.
    #[error("`{command}` failed with {status}{}", format_stderr(.stderr))]
    CommandStatus {
        /// Command line (credentials redacted).
        command: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
        /// Captured standard error (credentials redacted).
        stderr: String,
    },

    /// The checksum utility produced no SHA-256 token.
    #[error("no SHA-256 checksum found in output of `{command}`: {output:?}")]
    ChecksumNotFound {
        /// Checksum command line.
        command: String,
        /// Raw standard output of the command.
        output: String,
    },

    /// The checksum utility and the in-process digest disagree.
    #[error(
        "checksum mismatch for `{}`: utility reported {reported}, computed {computed}",
        .path.display()
    )]
    ChecksumMismatch {
        /// Archive whose checksum was taken.
        path: PathBuf,
        /// Value extracted from the utility output.
        reported: String,
        /// Value computed with sha2.
        computed: String,
    },

    /// The prebuilt binary for a platform is not in the working directory.
    #[error("prebuilt binary for {platform} not found at `{}`", .path.display())]
    MissingBinary {
        /// Platform being packaged.
        platform: Platform,
        /// Expected binary location.
        path: PathBuf,
    },

    /// A required external tool is not on `PATH`.
    #[error("required tool `{0}` was not found in PATH")]
    ToolNotFound(String),

    /// Packaging of one platform failed.
    #[error("packaging {platform} failed: {source}")]
    Packaging {
        /// Platform whose branch failed.
        platform: Platform,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Zip archive writer error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A packaging task panicked or was aborted.
    #[error("packaging task failed to complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Tap remote URL could not be parsed.
    #[error("invalid tap URL: {0}")]
    Url(#[from] url::ParseError),
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Attach path context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps an I/O error with the attempted operation and its path.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Convert missing values into [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Adds a message describing what was expected.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Return early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_operation() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result
            .fs_context("creating scratch directory", "standalone/macos")
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("creating scratch directory"));
        assert!(message.contains("standalone/macos"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let missing: Option<u8> = None;
        let err = missing.context("macos archive was not produced").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "macos archive was not produced"));
    }

    #[test]
    fn empty_stderr_is_not_appended() {
        assert_eq!(format_stderr("  \n"), "");
        assert_eq!(format_stderr("fatal: boom\n"), ": fatal: boom");
    }
}
