//! Album root discovery

pub mod scanner;

pub use scanner::{album_roots, resolve_root};
