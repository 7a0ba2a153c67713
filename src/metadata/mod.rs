//! Package name and version from the project manifest.
//!
//! Supports `package.json` (the default for the JavaScript CLIs this tool was
//! built around) and `Cargo.toml`. The manifest kind is chosen by extension.

use crate::bundler::PackageSettings;
use crate::error::{CliError, ReleaseError, Result};
use serde::Deserialize;
use std::path::Path;

/// Fields read from `package.json`. Everything else is ignored.
#[derive(Debug, Deserialize)]
struct PackageJson {
    name: String,
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
}

/// Load package metadata from a manifest file (single read + parse).
pub fn load_manifest(manifest_path: &Path) -> Result<PackageSettings> {
    let manifest = std::fs::read_to_string(manifest_path).map_err(|e| {
        log::error!("Failed to read {}: {}", manifest_path.display(), e);
        ReleaseError::Cli(CliError::ExecutionFailed {
            command: "read_manifest".to_string(),
            reason: format!("Failed to read {}: {}", manifest_path.display(), e),
        })
    })?;

    let is_toml = manifest_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let package = if is_toml {
        parse_cargo_toml(&manifest)?
    } else {
        parse_package_json(&manifest)?
    };

    log::info!(
        "Loaded {} {} from {}",
        package.name,
        package.version,
        manifest_path.display()
    );
    Ok(package)
}

fn parse_package_json(manifest: &str) -> Result<PackageSettings> {
    let parsed: PackageJson = serde_json::from_str(manifest)?;
    Ok(PackageSettings {
        name: parsed.name,
        version: parsed.version,
        description: parsed.description,
        homepage: parsed.homepage,
    })
}

fn parse_cargo_toml(manifest: &str) -> Result<PackageSettings> {
    let toml_value: toml::Value = toml::from_str(manifest)?;

    let package = toml_value.get("package").ok_or_else(|| {
        ReleaseError::Cli(CliError::InvalidArguments {
            reason: "No [package] section in Cargo.toml".to_string(),
        })
    })?;

    let field = |key: &str| {
        package
            .get(key)
            .and_then(|v| v.as_str())
            .map(String::from)
    };

    Ok(PackageSettings {
        name: field("name").ok_or_else(|| {
            ReleaseError::Cli(CliError::InvalidArguments {
                reason: "Missing 'name' in [package]".to_string(),
            })
        })?,
        version: field("version").ok_or_else(|| {
            ReleaseError::Cli(CliError::InvalidArguments {
                reason: "Missing 'version' in [package]".to_string(),
            })
        })?,
        description: field("description"),
        homepage: field("homepage"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_package_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(
            &path,
            r#"{"name": "hygen", "version": "6.1.0", "bin": {"hygen": "dist/bin.js"}}"#,
        )
        .unwrap();

        let package = load_manifest(&path).unwrap();
        assert_eq!(package.name, "hygen");
        assert_eq!(package.version, "6.1.0");
        assert_eq!(package.description, None);
    }

    #[test]
    fn reads_cargo_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        std::fs::write(
            &path,
            "[package]\nname = \"tool\"\nversion = \"0.3.0\"\ndescription = \"A tool\"\n",
        )
        .unwrap();

        let package = load_manifest(&path).unwrap();
        assert_eq!(package.name, "tool");
        assert_eq!(package.version, "0.3.0");
        assert_eq!(package.description.as_deref(), Some("A tool"));
    }

    #[test]
    fn version_is_taken_verbatim() {
        let package = parse_package_json(r#"{"name": "x", "version": "7.0.0-beta.1+build"}"#).unwrap();
        assert_eq!(package.version, "7.0.0-beta.1+build");
    }

    #[test]
    fn missing_fields_are_errors() {
        assert!(matches!(
            parse_package_json(r#"{"name": "hygen"}"#),
            Err(ReleaseError::Json(_))
        ));
        assert!(matches!(
            parse_cargo_toml("[package]\nname = \"tool\"\n"),
            Err(ReleaseError::Cli(CliError::InvalidArguments { .. }))
        ));
        assert!(matches!(
            parse_cargo_toml("[workspace]\n"),
            Err(ReleaseError::Cli(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(&dir.path().join("package.json")).unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }
}
