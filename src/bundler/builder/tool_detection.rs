//! External tool availability checking.
//!
//! Lookups only consult `PATH`; no tool is executed, so these checks are
//! safe to run before anything else happens.

use crate::bundler::error::{Error, Result};
use std::{path::PathBuf, sync::LazyLock};

/// Whether `tar` is on `PATH`.
pub static HAS_TAR: LazyLock<bool> = LazyLock::new(|| detect("tar"));

/// Whether `zip` is on `PATH`.
pub static HAS_ZIP: LazyLock<bool> = LazyLock::new(|| detect("zip"));

/// Whether `git` is on `PATH`.
pub static HAS_GIT: LazyLock<bool> = LazyLock::new(|| detect("git"));

fn detect(tool: &str) -> bool {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            true
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            false
        }
    }
}

/// Resolves a tool on `PATH`, failing with [`Error::ToolNotFound`].
pub fn require_tool(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|e| {
        log::error!("Required tool `{}` not found: {}", tool, e);
        Error::ToolNotFound(tool.to_string())
    })
}

/// Fails with [`Error::ToolNotFound`] unless the cached probe found `tool`.
pub fn ensure(available: &LazyLock<bool>, tool: &str) -> Result<()> {
    if **available {
        Ok(())
    } else {
        log::error!("Required tool `{}` not found in PATH", tool);
        Err(Error::ToolNotFound(tool.to_string()))
    }
}
