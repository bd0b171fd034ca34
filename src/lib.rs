//! m3uprep - Album playlist generation with Latin filename normalization
//!
//! A command-line utility that treats every immediate subdirectory of a root
//! directory as an album, renames audio files whose names use a mapped
//! non-Latin script to Latin characters, and writes one M3U playlist per
//! album listing its audio files relative to the album directory.
//!
//! # Architecture
//!
//! - `transliterate`: fixed character substitution table with derived capitals
//! - `album`: per-album walk, renames and playlist writing
//! - `discovery`: root validation and album root enumeration
//! - `pipeline`: fixed-size worker pool over album roots
//! - `config`: CLI argument parsing and runtime settings
//!
//! # Example
//!
//! ```no_run
//! use m3uprep::{config::Settings, pipeline};
//!
//! let settings = Settings::default();
//! let result = pipeline::run(&settings).expect("Root does not exist");
//! println!("Processed {} albums", result.successful);
//! ```

pub mod album;
pub mod config;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod transliterate;
pub mod types;

// Re-export key types at crate root
pub use error::{M3uError, Result};
pub use transliterate::Transliterator;
pub use types::{AlbumOutcome, AlbumReport, TraversalStats};
