//! Builder for constructing Settings.

use super::{
    Archiver, ChecksumSettings, FormulaSettings, PackageSettings, Settings, TapSettings,
};
use crate::{bail, bundler::platform::Platform};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Only the package metadata is required; everything else has the defaults
/// of the standard hygen release.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_standalone::bundler::{
///     Archiver, PackageSettings, Platform, SettingsBuilder, TapSettings,
/// };
///
/// # fn example() -> kodegen_bundler_standalone::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .work_dir("standalone")
///     .package_settings(PackageSettings {
///         name: "hygen".into(),
///         version: "6.1.0".into(),
///         ..Default::default()
///     })
///     .platforms(vec![Platform::Linux])
///     .archiver(Archiver::Builtin)
///     .tap_settings(TapSettings::github("jondot/homebrew-tap"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    package_settings: Option<PackageSettings>,
    work_dir: Option<PathBuf>,
    platforms: Option<Vec<Platform>>,
    archiver: Archiver,
    checksum: Option<ChecksumSettings>,
    formula: Option<FormulaSettings>,
    tap: Option<TapSettings>,
    temp_root: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets package metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets the working directory holding the prebuilt binaries.
    ///
    /// Default: `standalone`
    pub fn work_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.work_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Restricts packaging to the given platforms. Duplicates are dropped.
    ///
    /// Default: every platform in [`Platform::ALL`]
    pub fn platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    /// Sets the archiver.
    ///
    /// Default: [`Archiver::System`]
    pub fn archiver(mut self, archiver: Archiver) -> Self {
        self.archiver = archiver;
        self
    }

    /// Sets the checksum utility.
    ///
    /// Default: `shasum -a 256`
    pub fn checksum_settings(mut self, checksum: ChecksumSettings) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Sets formula metadata.
    ///
    /// Default: hygen metadata, with description and homepage taken from the
    /// package settings when present.
    pub fn formula_settings(mut self, formula: FormulaSettings) -> Self {
        self.formula = Some(formula);
        self
    }

    /// Sets the tap repository and commit identity.
    ///
    /// Default: `https://github.com/jondot/homebrew-tap`
    pub fn tap_settings(mut self, tap: TapSettings) -> Self {
        self.tap = Some(tap);
        self
    }

    /// Sets the parent directory for publish staging.
    ///
    /// Default: [`std::env::temp_dir`]
    pub fn temp_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.temp_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `package_settings` is missing, if the name or
    /// version is empty, if the name contains a path separator, or if the
    /// platform list is empty.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let package = self
            .package_settings
            .context("package_settings is required")?;

        if package.name.trim().is_empty() {
            bail!("package name must not be empty");
        }
        if package.name.contains(['/', '\\']) {
            bail!("package name must not contain path separators: {}", package.name);
        }
        if package.version.trim().is_empty() {
            bail!("package version must not be empty");
        }

        let mut platforms = Vec::new();
        for platform in self.platforms.unwrap_or_else(|| Platform::ALL.to_vec()) {
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }
        if platforms.is_empty() {
            bail!("at least one platform is required");
        }

        let formula = self.formula.unwrap_or_else(|| {
            let defaults = FormulaSettings::default();
            FormulaSettings {
                description: package
                    .description
                    .clone()
                    .unwrap_or(defaults.description),
                homepage: package.homepage.clone().unwrap_or(defaults.homepage),
                release_url: defaults.release_url,
            }
        });

        Ok(Settings::new(
            package,
            self.work_dir.unwrap_or_else(|| PathBuf::from("standalone")),
            platforms,
            self.archiver,
            self.checksum.unwrap_or_default(),
            formula,
            self.tap.unwrap_or_default(),
            self.temp_root.unwrap_or_else(std::env::temp_dir),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hygen() -> PackageSettings {
        PackageSettings {
            name: "hygen".into(),
            version: "6.1.0".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_cover_all_platforms() {
        let settings = SettingsBuilder::new()
            .package_settings(hygen())
            .build()
            .unwrap();

        assert_eq!(settings.platforms(), Platform::ALL);
        assert_eq!(settings.work_dir(), Path::new("standalone"));
        assert_eq!(settings.archiver(), Archiver::System);
        assert_eq!(settings.checksum().program, "shasum");
        assert_eq!(
            settings.tap().remote,
            "https://github.com/jondot/homebrew-tap"
        );
        assert_eq!(
            settings.archive_path(Platform::Windows),
            Path::new("standalone/hygen.win.exe.v6.1.0.zip")
        );
        assert_eq!(
            settings.binary_path(Platform::Linux),
            Path::new("standalone/hygen-linux")
        );
        assert_eq!(
            settings.scratch_dir(Platform::MacOs),
            Path::new("standalone/macos")
        );
    }

    #[test]
    fn scratch_dirs_are_distinct() {
        let settings = SettingsBuilder::new()
            .package_settings(hygen())
            .build()
            .unwrap();
        let dirs: std::collections::HashSet<_> = Platform::ALL
            .iter()
            .map(|p| settings.scratch_dir(*p))
            .collect();
        assert_eq!(dirs.len(), Platform::ALL.len());
    }

    #[test]
    fn package_metadata_feeds_formula_defaults() {
        let settings = SettingsBuilder::new()
            .package_settings(PackageSettings {
                description: Some("Code generator".into()),
                homepage: Some("https://example.com".into()),
                ..hygen()
            })
            .build()
            .unwrap();

        assert_eq!(settings.formula().description, "Code generator");
        assert_eq!(settings.formula().homepage, "https://example.com");
    }

    #[test]
    fn duplicate_platforms_are_dropped() {
        let settings = SettingsBuilder::new()
            .package_settings(hygen())
            .platforms(vec![Platform::Linux, Platform::Linux, Platform::MacOs])
            .build()
            .unwrap();
        assert_eq!(settings.platforms(), [Platform::Linux, Platform::MacOs]);
    }

    #[test]
    fn rejects_missing_or_bad_package() {
        assert!(SettingsBuilder::new().build().is_err());
        assert!(
            SettingsBuilder::new()
                .package_settings(PackageSettings {
                    version: String::new(),
                    ..hygen()
                })
                .build()
                .is_err()
        );
        assert!(
            SettingsBuilder::new()
                .package_settings(PackageSettings {
                    name: "../hygen".into(),
                    ..hygen()
                })
                .build()
                .is_err()
        );
        assert!(
            SettingsBuilder::new()
                .package_settings(hygen())
                .platforms(Vec::new())
                .build()
                .is_err()
        );
    }
}
