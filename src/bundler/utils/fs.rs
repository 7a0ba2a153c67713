//! File system utilities for packaging.
//!
//! All helpers are idempotent where the operation allows it: removing
//! something that is already gone, or creating a directory that already
//! exists, succeeds.

use crate::bundler::error::{ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
///
/// Failures are logged before being returned.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .inspect_err(|e| log::error!("Failed to create {}: {}", path.display(), e))
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            log::error!("Failed to remove {}: {}", path.display(), e);
            Err(e).fs_context("removing directory", path)
        }
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            log::error!("Failed to remove {}: {}", path.display(), e);
            Err(e).fs_context("removing file", path)
        }
    }
}

/// Moves a regular file, creating the destination's parent directories.
///
/// Falls back to copy-and-delete when a plain rename is not possible
/// (for example across filesystems).
pub async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating destination directory", dest_dir)?;
    }

    if let Err(e) = fs::rename(from, to).await {
        log::debug!(
            "rename {} -> {} failed ({}), copying instead",
            from.display(),
            to.display(),
            e
        );
        fs::copy(from, to).await.fs_context("copying file", from)?;
        fs::remove_file(from)
            .await
            .fs_context("removing moved file", from)?;
    }
    Ok(())
}

/// Marks a file executable (`0755`) on Unix. No-op elsewhere.
pub async fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("setting executable permissions", path)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// One entry of a directory listing.
#[derive(Debug, Clone)]
pub struct ListedEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Lists the direct children of `dir`, sorted by file name.
pub async fn list_dir(dir: &Path) -> Result<Vec<ListedEntry>> {
    let mut reader = fs::read_dir(dir)
        .await
        .fs_context("reading directory", dir)?;
    let mut entries = Vec::new();

    while let Some(entry) = reader
        .next_entry()
        .await
        .fs_context("reading directory entry", dir)?
    {
        let metadata = entry
            .metadata()
            .await
            .fs_context("reading metadata", entry.path())?;
        entries.push(ListedEntry {
            path: entry.path(),
            size: if metadata.is_dir() { 0 } else { metadata.len() },
            is_dir: metadata.is_dir(),
        });
    }

    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(entries)
}
