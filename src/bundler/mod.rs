//! Standalone archive packaging.
//!
//! Turns the prebuilt per-platform binaries of a release into
//! `<name>.<platform>.v<version>.<ext>` archives:
//!
//! - [`settings`] - Immutable run configuration and its builder
//! - [`platform`] - Platform identifiers, archive formats, per-platform packaging
//! - [`builder`] - Concurrent orchestration, checksums, tool detection
//! - [`utils`] - Filesystem helpers and the external command runner

pub mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::Bundler;
pub use error::{Error, Result};
pub use platform::{ArchiveFormat, Platform};
pub use settings::{
    Archiver, ChecksumSettings, FormulaSettings, PackageSettings, Settings, SettingsBuilder,
    TapSettings,
};

use std::path::PathBuf;

/// A packaged release archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Platform the archive was built for.
    pub platform: Platform,
    /// Location of the archive.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Lowercase hex SHA-256 of the archive.
    pub checksum: String,
}
