//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// m3uprep - per-album M3U playlists with Latin filenames
///
/// Treats every immediate subdirectory of ROOT as an album, renames audio
/// files whose names use the mapped script to Latin characters, and writes
/// `<album>/<album>.m3u` listing every audio file relative to the album.
#[derive(Parser, Debug)]
#[command(name = "m3uprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory whose subdirectories are albums
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the log filter directive based on verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
