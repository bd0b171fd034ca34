//! Runtime configuration settings

use crate::pipeline::ALBUM_WORKERS;
use std::path::PathBuf;

/// Runtime settings for the pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root directory whose subdirectories are albums
    pub root: PathBuf,
    /// Number of albums processed concurrently
    pub workers: usize,
    /// Show a progress bar over albums
    pub show_progress: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        Self {
            root: cli.root.clone(),
            workers: ALBUM_WORKERS,
            show_progress: !cli.quiet,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            workers: ALBUM_WORKERS,
            show_progress: true,
        }
    }
}
