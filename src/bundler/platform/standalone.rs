//! Standalone archive packaging for a single platform.
//!
//! The prebuilt `<name>-<platform>` binary is moved into a fresh scratch
//! directory under its final executable name, archived next to the scratch
//! directory, and the scratch directory is removed whether or not archiving
//! succeeded.

use super::{ArchiveFormat, Platform};
use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::{Archiver, Settings},
    utils::{fs, process::ExternalCommand},
};
use std::path::{Path, PathBuf};

/// Package the prebuilt binary for `platform` into its release archive.
///
/// # Returns
///
/// Path of the created archive, `<work_dir>/<name>.<platform>.v<version>.<ext>`.
pub async fn bundle_project(settings: &Settings, platform: Platform) -> Result<PathBuf> {
    let binary = settings.binary_path(platform);
    let is_file = tokio::fs::metadata(&binary)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        log::error!(
            "Prebuilt binary for {} not found: {}",
            platform,
            binary.display()
        );
        return Err(Error::MissingBinary {
            platform,
            path: binary,
        });
    }

    let scratch = settings.scratch_dir(platform);
    let archive = settings.archive_path(platform);
    log::info!("Packaging {} -> {}", platform, archive.display());

    fs::create_dir_all(&scratch, true).await?;

    let packaged = package_in_scratch(settings, platform, &binary, &scratch, &archive).await;
    let cleaned = fs::remove_dir_all(&scratch).await;

    packaged?;
    cleaned?;
    Ok(archive)
}

async fn package_in_scratch(
    settings: &Settings,
    platform: Platform,
    binary: &Path,
    scratch: &Path,
    archive: &Path,
) -> Result<()> {
    let executable = platform.executable_name(settings.name());
    let staged = scratch.join(&executable);

    fs::move_file(binary, &staged).await?;
    fs::make_executable(&staged).await?;

    // zip updates an existing archive in place, so start from nothing.
    fs::remove_file(archive).await?;

    match settings.archiver() {
        Archiver::System => {
            system_archive(platform.archive_format(), scratch, &executable, archive).await
        }
        Archiver::Builtin => {
            builtin_archive(platform.archive_format(), staged, executable, archive).await
        }
    }
}

/// Runs `zip` or `tar` from inside the scratch directory.
async fn system_archive(
    format: ArchiveFormat,
    scratch: &Path,
    executable: &str,
    archive: &Path,
) -> Result<()> {
    let archive_name = archive.file_name().ok_or_else(|| {
        Error::GenericError(format!("invalid archive path: {}", archive.display()))
    })?;
    // The archive lands beside the scratch directory.
    let target = Path::new("..").join(archive_name);

    let command = match format {
        ArchiveFormat::Zip => ExternalCommand::new("zip").arg(&target).arg(executable),
        ArchiveFormat::TarGz => ExternalCommand::new("tar")
            .arg("-czvf")
            .arg(&target)
            .arg(executable),
    };

    command.current_dir(scratch).run().await?;
    Ok(())
}

/// Writes the archive in-process.
async fn builtin_archive(
    format: ArchiveFormat,
    staged: PathBuf,
    executable: String,
    archive: &Path,
) -> Result<()> {
    let archive = archive.to_path_buf();

    tokio::task::spawn_blocking(move || match format {
        ArchiveFormat::Zip => write_zip(&staged, &executable, &archive),
        ArchiveFormat::TarGz => write_tar_gz(&staged, &executable, &archive),
    })
    .await?
}

fn write_tar_gz(staged: &Path, executable: &str, archive: &Path) -> Result<()> {
    use flate2::{Compression, write::GzEncoder};

    let file = std::fs::File::create(archive).fs_context("creating archive", archive)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder
        .append_path_with_name(staged, executable)
        .fs_context("adding binary to tar archive", staged)?;
    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .fs_context("finishing tar archive", archive)?;
    Ok(())
}

fn write_zip(staged: &Path, executable: &str, archive: &Path) -> Result<()> {
    use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

    let file = std::fs::File::create(archive).fs_context("creating archive", archive)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    writer.start_file(executable, options)?;
    let mut input = std::fs::File::open(staged).fs_context("opening staged binary", staged)?;
    std::io::copy(&mut input, &mut writer).fs_context("writing binary to zip archive", archive)?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{PackageSettings, SettingsBuilder};
    use std::io::Read;

    fn settings(work_dir: &Path, archiver: Archiver) -> Settings {
        SettingsBuilder::new()
            .work_dir(work_dir)
            .package_settings(PackageSettings {
                name: "hygen".into(),
                version: "6.1.0".into(),
                ..Default::default()
            })
            .archiver(archiver)
            .build()
            .unwrap()
    }

    fn seed(work_dir: &Path, platform: Platform) {
        std::fs::write(
            work_dir.join(platform.binary_file_name("hygen")),
            format!("#!/bin/sh\necho {platform}\n"),
        )
        .unwrap();
    }

    fn tar_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let name = entry.path().unwrap().to_string_lossy().into_owned();
                let mut body = Vec::new();
                entry.read_to_end(&mut body).unwrap();
                (name, body)
            })
            .collect()
    }

    #[tokio::test]
    async fn builtin_tar_gz_holds_single_named_binary() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), Platform::Linux);
        let settings = settings(dir.path(), Archiver::Builtin);

        let archive = bundle_project(&settings, Platform::Linux).await.unwrap();

        assert_eq!(archive, dir.path().join("hygen.linux.v6.1.0.tar.gz"));
        let entries = tar_entries(&archive);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "hygen");
        assert_eq!(entries[0].1, b"#!/bin/sh\necho linux\n");
        assert!(!settings.scratch_dir(Platform::Linux).exists());
        assert!(!settings.binary_path(Platform::Linux).exists());
    }

    #[tokio::test]
    async fn builtin_zip_holds_single_exe() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), Platform::Windows);
        let settings = settings(dir.path(), Archiver::Builtin);

        let archive = bundle_project(&settings, Platform::Windows).await.unwrap();

        assert_eq!(archive, dir.path().join("hygen.win.exe.v6.1.0.zip"));
        let mut zip = zip::ZipArchive::new(std::fs::File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), 1);
        let mut entry = zip.by_index(0).unwrap();
        assert_eq!(entry.name(), "hygen.exe");
        let mut body = String::new();
        entry.read_to_string(&mut body).unwrap();
        assert_eq!(body, "#!/bin/sh\necho win.exe\n");
        assert!(!settings.scratch_dir(Platform::Windows).exists());
    }

    #[tokio::test]
    async fn missing_binary_fails_without_scratch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), Archiver::Builtin);

        let err = bundle_project(&settings, Platform::MacOs).await.unwrap_err();

        assert!(matches!(err, Error::MissingBinary { platform: Platform::MacOs, .. }));
        assert!(!settings.scratch_dir(Platform::MacOs).exists());
        assert!(!settings.archive_path(Platform::MacOs).exists());
    }

    #[tokio::test]
    async fn failed_archiving_still_removes_scratch_dir() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), Platform::Linux);
        let settings = settings(dir.path(), Archiver::Builtin);
        // A directory where the archive should go makes archive creation fail.
        std::fs::create_dir_all(settings.archive_path(Platform::Linux).join("blocker")).unwrap();

        assert!(bundle_project(&settings, Platform::Linux).await.is_err());
        assert!(!settings.scratch_dir(Platform::Linux).exists());
    }

    #[tokio::test]
    async fn rerun_replaces_previous_archive() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), Archiver::Builtin);
        std::fs::write(settings.archive_path(Platform::Windows), b"stale").unwrap();
        seed(dir.path(), Platform::Windows);

        let archive = bundle_project(&settings, Platform::Windows).await.unwrap();

        let zip = zip::ZipArchive::new(std::fs::File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), 1);
    }

    #[tokio::test]
    async fn system_tar_matches_layout() {
        if which::which("tar").is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), Platform::MacOs);
        let settings = settings(dir.path(), Archiver::System);

        let archive = bundle_project(&settings, Platform::MacOs).await.unwrap();

        let entries = tar_entries(&archive);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "hygen");
        assert!(!settings.scratch_dir(Platform::MacOs).exists());
    }

    #[tokio::test]
    async fn system_zip_matches_layout() {
        if which::which("zip").is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), Platform::Windows);
        let settings = settings(dir.path(), Archiver::System);

        let archive = bundle_project(&settings, Platform::Windows).await.unwrap();

        let mut zip = zip::ZipArchive::new(std::fs::File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), 1);
        assert_eq!(zip.by_index(0).unwrap().name(), "hygen.exe");
    }
}
