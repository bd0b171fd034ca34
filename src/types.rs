//! Core data types for m3uprep
//!
//! These types describe the outcome of processing album roots and flow
//! from the album processor up through the pipeline.

use crate::error::M3uError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Fixed audio file suffix (plain suffix match on the file name)
pub const AUDIO_SUFFIX: &str = "mp3";

/// Playlist file extension
pub const PLAYLIST_EXTENSION: &str = "m3u";

/// Per-run counters owned by one album processor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Directories visited, including the album root
    pub dirs: usize,
    /// Audio files written to the playlist
    pub files: usize,
    /// Audio files renamed to their transliterated name
    pub renamed: usize,
}

/// Summary of one completed album
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumReport {
    pub root: PathBuf,
    pub playlist: PathBuf,
    pub stats: TraversalStats,
}

impl fmt::Display for AlbumReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: processed {} dirs, {} files [{} renamed]",
            self.root.display(),
            self.stats.dirs,
            self.stats.files,
            self.stats.renamed
        )
    }
}

/// Outcome of one unit of work in the pipeline
#[derive(Debug)]
pub enum AlbumOutcome {
    Done(AlbumReport),
    Failed { root: PathBuf, error: M3uError },
}

impl AlbumOutcome {
    pub fn root(&self) -> &Path {
        match self {
            AlbumOutcome::Done(report) => &report.root,
            AlbumOutcome::Failed { root, .. } => root,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AlbumOutcome::Done(_))
    }

    /// One console line for this album
    pub fn summary_line(&self) -> String {
        match self {
            AlbumOutcome::Done(report) => report.to_string(),
            AlbumOutcome::Failed { root, .. } => format!("{}: failure", root.display()),
        }
    }
}

/// True when a file name carries the audio suffix
pub fn is_audio_name(name: &str) -> bool {
    name.ends_with(AUDIO_SUFFIX)
}
