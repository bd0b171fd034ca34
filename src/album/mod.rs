//! Per-album processing: transliterating renames and playlist generation

pub mod processor;

pub use processor::{process_album, AlbumProcessor};
