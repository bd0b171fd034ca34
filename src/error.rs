//! Unified error types for m3uprep
//!
//! Error strategy:
//! - Per-album errors (directory read, rename, playlist write): abort that
//!   album only, reported by the pipeline, never propagated to siblings
//! - Root errors (missing root, pool setup): fatal, abort the whole run
//!
//! All errors carry the path they concern.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for m3uprep operations
#[derive(Debug, Error)]
pub enum M3uError {
    #[error("Path does not exist: '{0}'\n  Tip: Check the path is correct and accessible")]
    PathNotFound(PathBuf),

    #[error("Cannot create playlist '{path}': {source}\n  Tip: Check write permissions for the album directory")]
    PlaylistOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read directory '{path}': {reason}")]
    DirectoryRead { path: PathBuf, reason: String },

    #[error("Cannot rename '{}' to '{}': {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write to playlist '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for m3uprep operations
pub type Result<T> = std::result::Result<T, M3uError>;

impl M3uError {
    /// Create a directory read error from a walk failure
    pub fn directory_read(path: impl Into<PathBuf>, err: &walkdir::Error) -> Self {
        let reason = if err.loop_ancestor().is_some() {
            "filesystem loop detected (symlink points to an ancestor)".to_string()
        } else {
            match err.io_error() {
                Some(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
                    "Permission denied".to_string()
                }
                Some(io) => io.to_string(),
                None => err.to_string(),
            }
        };
        M3uError::DirectoryRead {
            path: path.into(),
            reason,
        }
    }
}

/// Extension trait for attaching a directory to raw I/O errors
pub trait ErrorContext<T> {
    /// Map an I/O failure while listing `path` into a directory read error
    fn with_dir_context(self, path: &Path) -> Result<T>;
}

impl<T> ErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn with_dir_context(self, path: &Path) -> Result<T> {
        self.map_err(|e| M3uError::DirectoryRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
