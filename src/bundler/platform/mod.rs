//! Release platforms and their archive conventions.
//!
//! Each platform fixes three things: the archive format, the name the binary
//! takes inside the archive, and the file names of the prebuilt input and the
//! produced artifact.

pub mod standalone;

use std::{fmt, str::FromStr};

/// Archive format produced for a platform.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ArchiveFormat {
    /// `.zip` archive (Windows-style targets).
    Zip,
    /// gzip-compressed tar archive.
    TarGz,
}

impl ArchiveFormat {
    /// File extension without a leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

/// Target platform of a prebuilt standalone binary.
///
/// Ordering follows [`Platform::ALL`] and is used to report the first failure
/// deterministically when several packaging branches fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Platform {
    /// macOS (`macos`), gzip-tar. Its archive is the one the formula points at.
    MacOs,
    /// Windows (`win.exe`), zip.
    Windows,
    /// Linux (`linux`), gzip-tar.
    Linux,
}

impl Platform {
    /// Every supported platform, in packaging and report order.
    pub const ALL: [Platform; 3] = [Platform::MacOs, Platform::Windows, Platform::Linux];

    /// Platform whose archive is checksummed and referenced by the formula.
    pub const FORMULA: Platform = Platform::MacOs;

    /// Identifier used in binary names, scratch directories and archive names.
    pub fn id(self) -> &'static str {
        match self {
            Platform::MacOs => "macos",
            Platform::Windows => "win.exe",
            Platform::Linux => "linux",
        }
    }

    /// Archive format policy for this platform.
    pub fn archive_format(self) -> ArchiveFormat {
        match self {
            Platform::Windows => ArchiveFormat::Zip,
            Platform::MacOs | Platform::Linux => ArchiveFormat::TarGz,
        }
    }

    /// Name of the binary inside the archive.
    pub fn executable_name(self, name: &str) -> String {
        match self {
            Platform::Windows => format!("{name}.exe"),
            Platform::MacOs | Platform::Linux => name.to_string(),
        }
    }

    /// File name of the prebuilt binary in the working directory: `<name>-<platform>`.
    pub fn binary_file_name(self, name: &str) -> String {
        format!("{name}-{}", self.id())
    }

    /// File name of the produced archive: `<name>.<platform>.v<version>.<ext>`.
    pub fn archive_file_name(self, name: &str, version: &str) -> String {
        format!(
            "{name}.{}.v{version}.{}",
            self.id(),
            self.archive_format().extension()
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "macos" | "darwin" => Ok(Platform::MacOs),
            "win.exe" | "win" | "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            other => Err(format!(
                "Invalid platform: {other}. Valid platforms: {}",
                Platform::ALL.map(Platform::id).join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_names_follow_release_convention() {
        assert_eq!(
            Platform::MacOs.archive_file_name("hygen", "6.1.0"),
            "hygen.macos.v6.1.0.tar.gz"
        );
        assert_eq!(
            Platform::Windows.archive_file_name("hygen", "6.1.0"),
            "hygen.win.exe.v6.1.0.zip"
        );
        assert_eq!(
            Platform::Linux.archive_file_name("hygen", "6.1.0"),
            "hygen.linux.v6.1.0.tar.gz"
        );
    }

    #[test]
    fn only_windows_is_zipped() {
        assert_eq!(Platform::Windows.archive_format(), ArchiveFormat::Zip);
        assert_eq!(Platform::MacOs.archive_format(), ArchiveFormat::TarGz);
        assert_eq!(Platform::Linux.archive_format(), ArchiveFormat::TarGz);
    }

    #[test]
    fn binary_names() {
        assert_eq!(Platform::Windows.binary_file_name("hygen"), "hygen-win.exe");
        assert_eq!(Platform::Windows.executable_name("hygen"), "hygen.exe");
        assert_eq!(Platform::Linux.executable_name("hygen"), "hygen");
    }

    #[test]
    fn parses_ids_and_aliases() {
        for platform in Platform::ALL {
            assert_eq!(platform.id().parse::<Platform>(), Ok(platform));
        }
        assert_eq!("windows".parse::<Platform>(), Ok(Platform::Windows));
        let err = "solaris".parse::<Platform>().unwrap_err();
        assert!(err.contains("macos, win.exe, linux"));
    }
}
