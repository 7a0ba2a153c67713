//! Artifact checksum calculation.
//!
//! Two sources: the in-process SHA-256 digest (reported for every artifact)
//! and the configured external checksum utility, whose output is what the
//! formula is published with.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::ChecksumSettings,
    utils::process::ExternalCommand,
};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// A SHA-256 token: exactly 64 hex digits not embedded in a longer hex run.
const SHA256_TOKEN: &str = r"(?:^|[^0-9A-Fa-f])([0-9A-Fa-f]{64})(?:[^0-9A-Fa-f]|$)";

/// Calculates the SHA-256 checksum of a file.
///
/// Reads in 8KB chunks.
///
/// # Returns
///
/// * `Ok(String)` - Lowercase hex-encoded SHA-256 hash (64 characters)
/// * `Err` - If the file cannot be read
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Pulls the first SHA-256 token out of checksum-utility output.
///
/// The result is lowercased. `command` only labels the error.
pub fn extract_checksum(command: &str, output: &str) -> Result<String> {
    let pattern = Regex::new(SHA256_TOKEN)
        .map_err(|e| Error::GenericError(format!("invalid checksum pattern: {e}")))?;

    pattern
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .ok_or_else(|| {
            log::error!("No checksum in output of `{}`: {:?}", command, output);
            Error::ChecksumNotFound {
                command: command.to_string(),
                output: output.to_string(),
            }
        })
}

/// Runs the external checksum utility on `path` and extracts its checksum.
pub async fn checksum_with_utility(settings: &ChecksumSettings, path: &Path) -> Result<String> {
    let command = ExternalCommand::new(&settings.program)
        .args(&settings.args)
        .arg(path)
        .capture();
    let output = command.run().await?;
    extract_checksum(&command.display(), &output.stdout)
}

/// Checksums `path` with the utility and cross-checks it against sha2.
pub async fn verified_checksum(settings: &ChecksumSettings, path: &Path) -> Result<String> {
    let reported = checksum_with_utility(settings, path).await?;
    let computed = calculate_sha256(path).await?;

    if reported != computed {
        log::error!(
            "Checksum mismatch for {}: {} vs {}",
            path.display(),
            reported,
            computed
        );
        return Err(Error::ChecksumMismatch {
            path: path.to_path_buf(),
            reported,
            computed,
        });
    }

    log::debug!("SHA-256 {} = {}", path.display(), reported);
    Ok(reported)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_SHA: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[tokio::test]
    async fn sha256_of_known_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello");
        std::fs::write(&path, b"hello").unwrap();

        assert_eq!(calculate_sha256(&path).await.unwrap(), HELLO_SHA);
    }

    #[test]
    fn extracts_token_from_shasum_output() {
        let output = format!("{HELLO_SHA}  standalone/hygen.macos.v6.1.0.tar.gz\n");
        assert_eq!(extract_checksum("shasum", &output).unwrap(), HELLO_SHA);
    }

    #[test]
    fn extraction_lowercases_and_ignores_prefix_text() {
        let output = format!("SHA256 (file) = {}\n", HELLO_SHA.to_uppercase());
        assert_eq!(extract_checksum("openssl", &output).unwrap(), HELLO_SHA);
    }

    #[test]
    fn words_made_of_hex_letters_are_not_checksums() {
        let err = extract_checksum("shasum", "failed to read: no such file\n").unwrap_err();
        match err {
            Error::ChecksumNotFound { command, output } => {
                assert_eq!(command, "shasum");
                assert!(output.contains("no such file"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn longer_hex_runs_are_rejected() {
        let output = format!("{HELLO_SHA}00  file\n");
        assert!(extract_checksum("shasum", &output).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn utility_output_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive");
        std::fs::write(&path, b"hello").unwrap();
        let settings = ChecksumSettings {
            program: "sh".into(),
            args: vec!["-c".into(), format!("echo '{HELLO_SHA}  '\"$0\"")],
        };

        let sum = verified_checksum(&settings, &path).await.unwrap();
        assert_eq!(sum, HELLO_SHA);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn utility_disagreeing_with_sha2_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive");
        std::fs::write(&path, b"not hello").unwrap();
        let settings = ChecksumSettings {
            program: "sh".into(),
            args: vec!["-c".into(), format!("echo '{HELLO_SHA}  '\"$0\"")],
        };

        let err = verified_checksum(&settings, &path).await.unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
    }
}
