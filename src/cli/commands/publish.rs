//! Homebrew tap update for a packaged release.

use crate::bundler::{
    BundledArtifact, Platform, Settings,
    builder::checksum::verified_checksum,
    error::{Error as BundlerError, ErrorExt},
    utils::{fs, process::ExternalCommand},
};
use crate::cli::RuntimeConfig;
use crate::error::{CliError, Result};
use crate::formula::{formula_file_name, render_formula};
use crate::preflight::Credential;
use std::path::Path;
use url::Url;

/// Publishes the formula for the macOS archive to the configured tap.
///
/// This function:
/// 1. Creates a private staging directory under the settings' temp root
/// 2. Checksums the macOS archive (external utility, cross-checked natively)
/// 3. Renders `<name>.rb`
/// 4. Clones the tap with the token embedded in the remote URL
/// 5. Commits the formula as the configured author and pushes `HEAD`
///
/// The staging directory is removed whether or not publishing succeeds.
/// Nothing is retried; the first failing step aborts the publish.
///
/// ## Authentication
///
/// The token is inserted as the user name of `http(s)` remotes and is
/// redacted from every logged command line. Other remotes (`file://`,
/// `ssh://`) are used unchanged.
pub async fn publish_formula(
    settings: &Settings,
    artifacts: &[BundledArtifact],
    credential: &Credential,
    runtime_config: &RuntimeConfig,
) -> Result<()> {
    let artifact = artifacts
        .iter()
        .find(|a| a.platform == Platform::FORMULA)
        .ok_or_else(|| CliError::ExecutionFailed {
            command: "publish".to_string(),
            reason: format!(
                "no {} archive was packaged; the formula points at it",
                Platform::FORMULA
            ),
        })?;

    let staging = tempfile::Builder::new()
        .prefix("kodegen-tap-")
        .tempdir_in(settings.temp_root())
        .fs_context("creating publish staging directory", settings.temp_root())?;
    log::debug!("Publish staging directory: {}", staging.path().display());

    let result = publish_in(staging.path(), settings, &artifact.path, credential, runtime_config).await;

    let staging_path = staging.path().to_path_buf();
    if let Err(e) = staging.close() {
        log::warn!(
            "Failed to remove staging directory {}: {}",
            staging_path.display(),
            e
        );
    }

    result
}

async fn publish_in(
    staging: &Path,
    settings: &Settings,
    archive: &Path,
    credential: &Credential,
    runtime_config: &RuntimeConfig,
) -> Result<()> {
    let name = settings.name();
    let version = settings.version_string();

    // Step 1: Checksum
    runtime_config.verbose_println(&format!("   Checksumming {}", archive.display()))?;
    let checksum = verified_checksum(settings.checksum(), archive).await?;
    runtime_config.indent(&format!("sha256 {checksum}"))?;

    // Step 2: Render formula
    let file_name = formula_file_name(name);
    let formula_path = staging.join(&file_name);
    let formula = render_formula(settings.formula(), name, &checksum, version);
    tokio::fs::write(&formula_path, formula)
        .await
        .fs_context("writing formula", &formula_path)?;

    // Step 3: Clone tap
    let tap = settings.tap();
    let remote = authenticated_remote(&tap.remote, credential)?;
    let tap_dir = staging.join("tap");
    runtime_config.progress(&format!("Cloning tap {}", tap.remote))?;
    git(runtime_config, credential, &remote)
        .args(["clone", "--depth", "1", remote.as_str()])
        .arg(&tap_dir)
        .run()
        .await?;

    // Step 4: Commit formula
    fs::move_file(&formula_path, &tap_dir.join(&file_name)).await?;
    git(runtime_config, credential, &remote)
        .arg("-C")
        .arg(&tap_dir)
        .args(["add", "--", file_name.as_str()])
        .run()
        .await?;

    let status = git(runtime_config, credential, &remote)
        .arg("-C")
        .arg(&tap_dir)
        .args(["status", "--porcelain"])
        .capture()
        .run()
        .await?;
    if status.stdout.trim().is_empty() {
        runtime_config.warn(&format!(
            "{file_name} already matches {name} v{version}; nothing to push"
        ))?;
        return Ok(());
    }

    let message = commit_message(name, version);
    git(runtime_config, credential, &remote)
        .arg("-C")
        .arg(&tap_dir)
        .arg("-c")
        .arg(format!("user.name={}", tap.author_name))
        .arg("-c")
        .arg(format!("user.email={}", tap.author_email))
        .args(["commit", "-m", message.as_str()])
        .run()
        .await?;
    runtime_config.verbose_println(&format!("   ✓ Committed: {message}"))?;

    // Step 5: Push
    runtime_config.progress("Pushing formula")?;
    git(runtime_config, credential, &remote)
        .arg("-C")
        .arg(&tap_dir)
        .args(["push", remote.as_str(), "HEAD"])
        .run()
        .await?;

    runtime_config.success_println(&format!("Published {file_name} for {name} v{version}"))?;
    Ok(())
}

/// A `git` invocation with every form of the credential marked secret.
fn git(runtime_config: &RuntimeConfig, credential: &Credential, remote: &Url) -> ExternalCommand {
    let command = ExternalCommand::new("git")
        .secret(credential.expose())
        .secret(remote.username());
    if runtime_config.output().is_verbose() {
        command
    } else {
        command.capture()
    }
}

/// Commit message for a formula update.
pub fn commit_message(name: &str, version: &str) -> String {
    format!("{name}: release v{version}")
}

/// Embeds the token into an `http(s)` remote as its user name.
///
/// Other schemes are returned unchanged.
pub fn authenticated_remote(remote: &str, credential: &Credential) -> Result<Url> {
    let mut url = Url::parse(remote).map_err(BundlerError::from)?;
    if matches!(url.scheme(), "http" | "https") {
        url.set_username(credential.expose()).map_err(|()| {
            BundlerError::GenericError(format!("cannot embed credentials in {remote}"))
        })?;
    }
    Ok(url)
}
