//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, the conversion of
//! validated arguments into [`Settings`], and the [`RuntimeConfig`] used for
//! user-facing output.

use crate::bundler::{
    Archiver, ChecksumSettings, FormulaSettings, PackageSettings, Platform, Settings,
    SettingsBuilder, TapSettings, settings::DEFAULT_TAP,
};
use clap::Parser;
use std::path::PathBuf;

/// Standalone binary packager and Homebrew tap publisher
#[derive(Parser, Debug, Clone)]
#[command(
    name = "kodegen_bundler_standalone",
    version,
    about = "Archive standalone release binaries and publish a Homebrew formula",
    long_about = "Packages prebuilt per-platform binaries into release archives and, when
MANUAL_PUBLISH is set (or --publish is given), publishes an updated Homebrew
formula to a tap repository.

Expects <work-dir>/<name>-macos, <name>-win.exe and <name>-linux and produces
<work-dir>/<name>.<platform>.v<version>.<tar.gz|zip>.

Usage:
  kodegen_bundler_standalone --manifest package.json --work-dir standalone
  MANUAL_PUBLISH=1 GITHUB_TOKEN=... kodegen_bundler_standalone
  kodegen_bundler_standalone --platform linux --archiver builtin

Exit code 0 = every requested archive exists (and the tap was updated when publishing)."
)]
pub struct Args {
    /// Manifest providing name and version (package.json or Cargo.toml)
    #[arg(short, long, value_name = "PATH", default_value = "package.json")]
    pub manifest: PathBuf,

    /// Directory containing the prebuilt <name>-<platform> binaries
    #[arg(short = 'w', long, value_name = "DIR", default_value = "standalone")]
    pub work_dir: PathBuf,

    /// Platform to package: macos, win.exe, linux (repeatable; default all)
    #[arg(short, long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<String>,

    /// Archiver: system (zip/tar programs) or builtin (in-process)
    #[arg(long, value_name = "ARCHIVER", default_value = "system")]
    pub archiver: String,

    /// Publish the formula even if MANUAL_PUBLISH is not set
    #[arg(long)]
    pub publish: bool,

    /// Token for the tap remote
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Tap repository on GitHub as OWNER/REPO
    #[arg(long, value_name = "OWNER/REPO", default_value = DEFAULT_TAP)]
    pub tap: String,

    /// Full tap remote URL, overriding --tap
    #[arg(long, value_name = "URL")]
    pub tap_url: Option<String>,

    /// Checksum program; the archive path is appended to --checksum-arg values
    #[arg(long, value_name = "PROGRAM", default_value = "shasum")]
    pub checksum_command: String,

    /// Argument passed to the checksum program (repeatable; default "-a 256")
    #[arg(long = "checksum-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub checksum_args: Vec<String>,

    /// Formula description (default: manifest description, then the hygen description)
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Formula homepage (default: manifest homepage, then hygen.io)
    #[arg(long, value_name = "URL")]
    pub homepage: Option<String>,

    /// Base URL of release downloads; /v<version>/<archive> is appended
    #[arg(long, value_name = "URL")]
    pub release_url: Option<String>,

    /// Commit author name for the tap update
    #[arg(long, value_name = "NAME")]
    pub author_name: Option<String>,

    /// Commit author email for the tap update
    #[arg(long, value_name = "EMAIL")]
    pub author_email: Option<String>,

    /// Show command lines and extra detail
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        for platform in &self.platforms {
            platform.parse::<Platform>()?;
        }

        self.archiver.parse::<Archiver>()?;

        if self.tap_url.is_none() {
            let parts: Vec<&str> = self.tap.split('/').collect();
            if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
                return Err(format!(
                    "Invalid tap: {}. Expected OWNER/REPO",
                    self.tap
                ));
            }
        }

        if let Some(url) = &self.tap_url {
            url::Url::parse(url).map_err(|e| format!("Invalid tap URL {url}: {e}"))?;
        }

        if self.checksum_command.trim().is_empty() {
            return Err("Checksum command cannot be empty".to_string());
        }

        Ok(())
    }

    /// Parsed platform list; empty means every platform.
    pub fn platform_list(&self) -> Result<Vec<Platform>, String> {
        if self.platforms.is_empty() {
            return Ok(Platform::ALL.to_vec());
        }
        self.platforms.iter().map(|p| p.parse()).collect()
    }

    /// Builds run settings from validated arguments and the manifest's package data.
    pub fn to_settings(&self, package: PackageSettings) -> crate::error::Result<Settings> {
        let invalid = |reason: String| crate::error::CliError::InvalidArguments { reason };

        let platforms = self.platform_list().map_err(invalid)?;
        let archiver = self.archiver.parse::<Archiver>().map_err(invalid)?;

        let defaults = FormulaSettings::default();
        let formula = FormulaSettings {
            description: self
                .description
                .clone()
                .or_else(|| package.description.clone())
                .unwrap_or(defaults.description),
            homepage: self
                .homepage
                .clone()
                .or_else(|| package.homepage.clone())
                .unwrap_or(defaults.homepage),
            release_url: self.release_url.clone().unwrap_or(defaults.release_url),
        };

        let mut tap = match &self.tap_url {
            Some(url) => TapSettings {
                remote: url.clone(),
                ..Default::default()
            },
            None => TapSettings::github(&self.tap),
        };
        if let Some(name) = &self.author_name {
            tap.author_name = name.clone();
        }
        if let Some(email) = &self.author_email {
            tap.author_email = email.clone();
        }

        let checksum = if self.checksum_args.is_empty() && self.checksum_command == "shasum" {
            ChecksumSettings::default()
        } else {
            ChecksumSettings {
                program: self.checksum_command.clone(),
                args: self.checksum_args.clone(),
            }
        };

        Ok(SettingsBuilder::new()
            .package_settings(package)
            .work_dir(&self.work_dir)
            .platforms(platforms)
            .archiver(archiver)
            .checksum_settings(checksum)
            .formula_settings(formula)
            .tap_settings(tap)
            .build()?)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success_println(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
