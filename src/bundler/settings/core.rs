//! Core Settings struct and implementations.

use super::{ChecksumSettings, FormulaSettings, PackageSettings, TapSettings};
use crate::bundler::platform::Platform;
use std::path::{Path, PathBuf};

/// How archives are produced.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Archiver {
    /// Invoke the host `zip` and `tar` programs.
    #[default]
    System,
    /// Write archives in-process with the `zip`, `tar` and `flate2` crates.
    Builtin,
}

impl std::str::FromStr for Archiver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Archiver::System),
            "builtin" => Ok(Archiver::Builtin),
            other => Err(format!(
                "Invalid archiver: {other}. Valid archivers: system, builtin"
            )),
        }
    }
}

/// Immutable configuration for a release run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder) and passed by
/// reference into every packaging and publishing step.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_standalone::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_standalone::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .work_dir("standalone")
///     .package_settings(PackageSettings {
///         name: "hygen".into(),
///         version: "6.1.0".into(),
///         ..Default::default()
///     })
///     .build()?;
/// assert_eq!(settings.platforms().len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    package: PackageSettings,

    /// Directory holding the prebuilt `<name>-<platform>` binaries.
    ///
    /// Scratch directories and archives are created here too.
    work_dir: PathBuf,

    platforms: Vec<Platform>,

    archiver: Archiver,

    checksum: ChecksumSettings,

    formula: FormulaSettings,

    tap: TapSettings,

    /// Parent of the per-run publish staging directory.
    temp_root: PathBuf,
}

impl Settings {
    /// Returns the program name.
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the package metadata.
    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    /// Returns the working directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the platforms to package, in report order.
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Returns the archiver.
    pub fn archiver(&self) -> Archiver {
        self.archiver
    }

    /// Returns the checksum utility configuration.
    pub fn checksum(&self) -> &ChecksumSettings {
        &self.checksum
    }

    /// Returns the formula metadata.
    pub fn formula(&self) -> &FormulaSettings {
        &self.formula
    }

    /// Returns the tap configuration.
    pub fn tap(&self) -> &TapSettings {
        &self.tap
    }

    /// Returns the directory under which publish staging directories are created.
    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Location of the prebuilt binary for `platform`.
    pub fn binary_path(&self, platform: Platform) -> PathBuf {
        self.work_dir.join(platform.binary_file_name(self.name()))
    }

    /// Per-platform scratch directory. Unique per platform.
    pub fn scratch_dir(&self, platform: Platform) -> PathBuf {
        self.work_dir.join(platform.id())
    }

    /// Location of the archive produced for `platform`.
    pub fn archive_path(&self, platform: Platform) -> PathBuf {
        self.work_dir
            .join(platform.archive_file_name(self.name(), self.version_string()))
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        package: PackageSettings,
        work_dir: PathBuf,
        platforms: Vec<Platform>,
        archiver: Archiver,
        checksum: ChecksumSettings,
        formula: FormulaSettings,
        tap: TapSettings,
        temp_root: PathBuf,
    ) -> Self {
        Self {
            package,
            work_dir,
            platforms,
            archiver,
            checksum,
            formula,
            tap,
            temp_root,
        }
    }
}
