//! The release workflow: package every platform, then optionally publish.

use crate::bundler::{
    Bundler, BundledArtifact, Platform, Settings,
    builder::tool_detection::{HAS_GIT, ensure, require_tool},
    utils::fs::list_dir,
};
use crate::cli::RuntimeConfig;
use crate::error::{CliError, Result};
use crate::preflight::PublishMode;

use super::publish::publish_formula;

/// Runs a release and returns the process exit code.
///
/// Tools are checked before anything is touched. Packaging runs for every
/// configured platform concurrently; the formula is published only when
/// `mode` is [`PublishMode::Publish`].
pub async fn release(
    settings: Settings,
    mode: PublishMode,
    runtime_config: &RuntimeConfig,
) -> Result<i32> {
    let bundler = Bundler::new(settings);
    check_prerequisites(&bundler, &mode)?;
    let settings = bundler.settings();

    runtime_config.section(&format!(
        "📦 Packaging {} v{}",
        settings.name(),
        settings.version_string()
    ))?;
    for platform in settings.platforms() {
        runtime_config.verbose_println(&format!(
            "   {} <- {}",
            settings.archive_path(*platform).display(),
            settings.binary_path(*platform).display()
        ))?;
    }

    let artifacts = bundler.bundle().await?;
    report_artifacts(settings, &artifacts, runtime_config).await?;

    match mode {
        PublishMode::Skip => {
            runtime_config.verbose_println("   Publishing not requested; skipping formula update")?;
        }
        PublishMode::Publish(credential) => {
            runtime_config.section("🍺 Publishing Homebrew formula")?;
            publish_formula(settings, &artifacts, &credential, runtime_config).await?;
        }
    }

    Ok(0)
}

/// Fails before any side effect if a required tool or archive is unavailable.
fn check_prerequisites(bundler: &Bundler, mode: &PublishMode) -> Result<()> {
    bundler.check_tools()?;

    if let PublishMode::Publish(_) = mode {
        let settings = bundler.settings();
        if !settings.platforms().contains(&Platform::FORMULA) {
            return Err(CliError::InvalidArguments {
                reason: format!(
                    "publishing needs the {} archive; add --platform {}",
                    Platform::FORMULA,
                    Platform::FORMULA
                ),
            }
            .into());
        }
        ensure(&HAS_GIT, "git")?;
        require_tool(&settings.checksum().program)?;
    }

    Ok(())
}

async fn report_artifacts(
    settings: &Settings,
    artifacts: &[BundledArtifact],
    runtime_config: &RuntimeConfig,
) -> Result<()> {
    runtime_config.success_println(&format!("Packaged {} archive(s)", artifacts.len()))?;
    for artifact in artifacts {
        runtime_config.indent(&format!(
            "{} ({} bytes, sha256 {})",
            artifact.path.display(),
            artifact.size,
            artifact.checksum
        ))?;
    }

    if runtime_config.output().is_verbose() {
        runtime_config.verbose_println(&format!("   Contents of {}:", settings.work_dir().display()))?;
        for entry in list_dir(settings.work_dir()).await? {
            let kind = if entry.is_dir { "dir " } else { "file" };
            runtime_config.verbose_println(&format!(
                "   {kind} {:>12} {}",
                entry.size,
                entry.path.display()
            ))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{Archiver, PackageSettings, SettingsBuilder};
    use crate::cli::Args;
    use crate::preflight::Credential;
    use clap::Parser;

    fn quiet() -> RuntimeConfig {
        RuntimeConfig::from(&Args::try_parse_from(["kodegen_bundler_standalone", "-q"]).unwrap())
    }

    fn settings(work_dir: &std::path::Path, platforms: Vec<Platform>) -> Settings {
        SettingsBuilder::new()
            .package_settings(PackageSettings {
                name: "hygen".into(),
                version: "6.1.0".into(),
                ..Default::default()
            })
            .work_dir(work_dir)
            .platforms(platforms)
            .archiver(Archiver::Builtin)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn packages_all_platforms_without_publishing() {
        let work = tempfile::tempdir().unwrap();
        for id in ["macos", "win.exe", "linux"] {
            std::fs::write(work.path().join(format!("hygen-{id}")), b"bin").unwrap();
        }

        let code = release(settings(work.path(), Platform::ALL.to_vec()), PublishMode::Skip, &quiet())
            .await
            .unwrap();

        assert_eq!(code, 0);
        for archive in [
            "hygen.macos.v6.1.0.tar.gz",
            "hygen.win.exe.v6.1.0.zip",
            "hygen.linux.v6.1.0.tar.gz",
        ] {
            assert!(work.path().join(archive).is_file(), "{archive} missing");
        }
    }

    #[tokio::test]
    async fn publishing_without_macos_fails_before_packaging() {
        let work = tempfile::tempdir().unwrap();
        std::fs::write(work.path().join("hygen-linux"), b"bin").unwrap();

        let err = release(
            settings(work.path(), vec![Platform::Linux]),
            PublishMode::Publish(Credential::new("t")),
            &quiet(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("macos"));
        assert!(work.path().join("hygen-linux").is_file());
        assert!(!work.path().join("hygen.linux.v6.1.0.tar.gz").exists());
    }
}
