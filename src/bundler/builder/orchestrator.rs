//! Concurrent packaging of every configured platform.
//!
//! This module provides the [`Bundler`] orchestrator that runs one packaging
//! task per platform and collects the resulting artifacts.

use crate::bundler::{
    BundledArtifact, Platform, Result, Settings,
    error::{Error, ErrorExt},
    platform::standalone,
    settings::Archiver,
};
use std::{path::PathBuf, sync::Arc};
use tokio::task::JoinSet;

use super::{
    checksum::calculate_sha256,
    tool_detection::{HAS_TAR, HAS_ZIP, ensure},
};

/// Main bundler orchestrator.
///
/// Packages every platform from [`Settings::platforms`] concurrently. Each
/// task owns its platform's scratch directory, so tasks share nothing but
/// the working directory's namespace.
///
/// # Join policy
///
/// All tasks run to completion even when one fails; none is cancelled. This
/// guarantees every scratch directory has been removed by the time
/// [`Bundler::bundle`] returns. The first failure in platform order is then
/// reported.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_standalone::bundler::{Bundler, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_standalone::bundler::Result<()> {
/// let artifacts = Bundler::new(settings).bundle().await?;
/// for artifact in artifacts {
///     println!("{} {} ({} bytes)", artifact.platform, artifact.path.display(), artifact.size);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Bundler {
    settings: Arc<Settings>,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Checks that the archiving tools the configured platforms need are on `PATH`.
    ///
    /// Nothing is executed.
    pub fn check_tools(&self) -> Result<()> {
        if self.settings.archiver() == Archiver::Builtin {
            return Ok(());
        }
        let platforms = self.settings.platforms();
        if platforms.iter().any(|p| *p == Platform::Windows) {
            ensure(&HAS_ZIP, "zip")?;
        }
        if platforms.iter().any(|p| *p != Platform::Windows) {
            ensure(&HAS_TAR, "tar")?;
        }
        Ok(())
    }

    /// Packages every configured platform.
    ///
    /// # Returns
    ///
    /// One [`BundledArtifact`] per platform, in [`Settings::platforms`] order.
    pub async fn bundle(&self) -> Result<Vec<BundledArtifact>> {
        let mut tasks = JoinSet::new();
        for &platform in self.settings.platforms() {
            let settings = Arc::clone(&self.settings);
            tasks.spawn(async move {
                let result = standalone::bundle_project(&settings, platform).await;
                (platform, result)
            });
        }

        let mut packaged: Vec<(Platform, PathBuf)> = Vec::new();
        let mut failures: Vec<(Platform, Error)> = Vec::new();
        let mut join_failure: Option<Error> = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((platform, Ok(path))) => {
                    log::info!("✓ {} packaged: {}", platform, path.display());
                    packaged.push((platform, path));
                }
                Ok((platform, Err(e))) => {
                    log::error!("✗ {} packaging failed: {}", platform, e);
                    failures.push((platform, e));
                }
                Err(e) => {
                    log::error!("Packaging task did not complete: {}", e);
                    join_failure.get_or_insert(Error::Join(e));
                }
            }
        }

        if let Some(e) = join_failure {
            return Err(e);
        }
        if let Some((platform, source)) = failures.into_iter().min_by_key(|(p, _)| *p) {
            return Err(Error::Packaging {
                platform,
                source: Box::new(source),
            });
        }

        let mut artifacts = Vec::with_capacity(packaged.len());
        for &platform in self.settings.platforms() {
            let Some((_, path)) = packaged.iter().find(|(p, _)| *p == platform) else {
                continue;
            };
            let size = tokio::fs::metadata(path)
                .await
                .fs_context("reading artifact metadata", path)?
                .len();
            let checksum = calculate_sha256(path).await?;
            artifacts.push(BundledArtifact {
                platform,
                path: path.clone(),
                size,
                checksum,
            });
        }

        Ok(artifacts)
    }
}
