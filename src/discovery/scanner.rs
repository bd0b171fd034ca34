//! Album root discovery

use crate::error::{ErrorContext, M3uError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Check that the user-supplied root exists
pub fn resolve_root(input: &Path) -> Result<PathBuf> {
    if !input.exists() {
        return Err(M3uError::PathNotFound(input.to_path_buf()));
    }
    Ok(input.to_path_buf())
}

/// List the immediate subdirectories of `root`, in filesystem order
///
/// Fails with `PathNotFound` when `root` does not exist. Symlinks to
/// directories count as directories. Paths are made absolute when the
/// current directory is known.
pub fn album_roots(root: &Path) -> Result<Vec<PathBuf>> {
    let root = resolve_root(root)?;
    let base = absolute(&root);

    let mut albums = Vec::new();
    for entry in fs::read_dir(&base).with_dir_context(&base)? {
        let entry = entry.with_dir_context(&base)?;
        let path = entry.path();
        // Follows symlinks, like the walk inside each album
        if path.is_dir() {
            debug!("Album root: {}", path.display());
            albums.push(path);
        }
    }

    info!("Discovered {} album roots in {}", albums.len(), base.display());

    if albums.is_empty() {
        warn!("No subdirectories found in {}", base.display());
    }

    Ok(albums)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
