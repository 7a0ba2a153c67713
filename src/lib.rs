//! Standalone release packager library
//!
//! This library packages prebuilt per-platform binaries into release
//! archives and publishes a Homebrew formula for the macOS archive:
//! - macOS and Linux binaries as `.tar.gz`
//! - Windows binaries as `.zip`
//! - A `<name>.rb` formula pushed to a tap repository
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod formula;
pub mod metadata;
pub mod preflight;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
