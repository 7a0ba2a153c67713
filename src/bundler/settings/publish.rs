//! Publishing configuration: checksum utility, formula metadata and tap.

/// Default checksum utility.
pub const DEFAULT_CHECKSUM_PROGRAM: &str = "shasum";

/// Default tap repository (`owner/repo` on GitHub).
pub const DEFAULT_TAP: &str = "jondot/homebrew-tap";

/// Default formula description.
pub const DEFAULT_DESCRIPTION: &str =
    "The simple, fast, and scalable code generator that lives in your project.";

/// Default formula homepage.
pub const DEFAULT_HOMEPAGE: &str = "http://www.hygen.io/";

/// Default base of release download URLs.
pub const DEFAULT_RELEASE_URL: &str = "https://github.com/jondot/hygen/releases/download";

/// Default commit author name for tap updates.
pub const DEFAULT_AUTHOR_NAME: &str = "hygen-release";

/// Default commit author email for tap updates.
pub const DEFAULT_AUTHOR_EMAIL: &str = "hygen-release@users.noreply.github.com";

/// External checksum utility invocation.
///
/// The archive path is appended after `args`; the first SHA-256 token in the
/// utility's standard output is taken as the checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumSettings {
    /// Program to run (`shasum`, `sha256sum`, ...).
    pub program: String,
    /// Arguments placed before the archive path.
    pub args: Vec<String>,
}

impl Default for ChecksumSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_CHECKSUM_PROGRAM.to_string(),
            args: vec!["-a".to_string(), "256".to_string()],
        }
    }
}

/// Formula metadata that does not change between releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaSettings {
    /// `desc` line.
    pub description: String,
    /// `homepage` line.
    pub homepage: String,
    /// Base of the release download URL; `/v<version>/<archive>` is appended.
    pub release_url: String,
}

impl Default for FormulaSettings {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            homepage: DEFAULT_HOMEPAGE.to_string(),
            release_url: DEFAULT_RELEASE_URL.to_string(),
        }
    }
}

/// Tap repository and commit identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapSettings {
    /// Clone/push URL without credentials.
    pub remote: String,
    /// Commit author name.
    pub author_name: String,
    /// Commit author email.
    pub author_email: String,
}

impl TapSettings {
    /// Tap hosted on GitHub as `owner/repo`.
    pub fn github(slug: &str) -> Self {
        Self {
            remote: format!("https://github.com/{slug}"),
            ..Default::default()
        }
    }
}

impl Default for TapSettings {
    fn default() -> Self {
        Self {
            remote: format!("https://github.com/{DEFAULT_TAP}"),
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: DEFAULT_AUTHOR_EMAIL.to_string(),
        }
    }
}
