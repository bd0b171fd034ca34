//! Filename transliteration to Latin characters
//!
//! A fixed substitution table maps single characters of the source script
//! to Latin letters (plus a few digits and punctuation). Every literal pair
//! also registers a derived "capital" pair: the source code point shifted by
//! [`CAP_OFFSET_SRC`] maps to the target shifted by [`CAP_OFFSET_LATIN`].
//!
//! The offsets are applied uniformly to every pair, even where the script's
//! real case distance differs. Later insertions overwrite earlier ones.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Code point distance between the table's capital and small forms ('ﭼ' - 'ﻕ')
pub const CAP_OFFSET_SRC: i32 = 0xFB7C - 0xFED5;

/// Latin small-to-capital distance ('D' - 'd')
pub const CAP_OFFSET_LATIN: i32 = 'D' as i32 - 'd' as i32;

/// Literal (source, target) pairs, in insertion order
pub const SUBSTITUTIONS: &[(char, char)] = &[
    ('\u{FED3}', 'a'),
    ('\u{FED5}', 'b'),
    ('\u{FED7}', 'v'),
    ('\u{FED9}', 'g'),
    ('\u{FEDB}', 'd'),
    ('\u{FB92}', 'e'),
    ('\u{FB94}', 'j'),
    ('\u{FEDD}', 'z'),
    ('\u{FEDF}', 'i'),
    ('\u{FEE0}', 'i'),
    ('\u{FEE1}', 'k'),
    ('\u{FEE3}', 'l'),
    ('\u{FB9E}', 'm'),
    ('\u{FEE5}', 'n'),
    ('\u{FEE7}', 'o'),
    ('\u{FE85}', 'p'),
    ('\u{FEED}', 'r'),
    ('\u{FBA6}', 's'),
    ('\u{FBA8}', 't'),
    ('\u{FBA9}', 'u'),
    ('\u{FBAA}', 'f'),
    ('\u{FE80}', 'h'),
    ('\u{FE89}', 'c'),
    ('\u{FE8A}', '4'),
    ('\u{FE8B}', 's'),
    ('\u{FEF1}', 's'),
    ('\u{FEF2}', '`'),
    ('\u{FEF3}', 'y'),
    ('\u{FBB0}', '`'),
    ('\u{FBAE}', 'e'),
    ('\u{FE7C}', 'u'),
    ('\u{FE7D}', 'a'),
];

static GLOBAL: Lazy<Transliterator> = Lazy::new(|| Transliterator::from_pairs(SUBSTITUTIONS));

/// Immutable character substitution table
#[derive(Debug, Clone)]
pub struct Transliterator {
    table: HashMap<char, char>,
}

impl Transliterator {
    /// The process-wide table built from [`SUBSTITUTIONS`]
    pub fn global() -> &'static Transliterator {
        &GLOBAL
    }

    /// Build a table from literal pairs, registering the derived capital of each
    pub fn from_pairs(pairs: &[(char, char)]) -> Self {
        let mut table = HashMap::with_capacity(pairs.len() * 2);

        for &(src, dst) in pairs {
            insert(&mut table, src, dst);

            match (shift(src, CAP_OFFSET_SRC), shift(dst, CAP_OFFSET_LATIN)) {
                (Some(cap_src), Some(cap_dst)) => insert(&mut table, cap_src, cap_dst),
                _ => warn!(
                    "No capital form for U+{:04X} -> {:?}, skipping derived entry",
                    src as u32, dst
                ),
            }
        }

        Self { table }
    }

    /// Convert a single character; identity when unmapped
    pub fn convert(&self, c: char) -> char {
        self.table.get(&c).copied().unwrap_or(c)
    }

    /// Convert every character of `name`, preserving count and order
    pub fn transliterate(&self, name: &str) -> String {
        name.chars().map(|c| self.convert(c)).collect()
    }

    /// True when `name` contains no mapped character
    pub fn is_latin(&self, name: &str) -> bool {
        !name.chars().any(|c| self.table.contains_key(&c))
    }

    /// Number of distinct keys in the table
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Convert a single character with the global table
pub fn convert(c: char) -> char {
    Transliterator::global().convert(c)
}

/// Transliterate a filename with the global table
pub fn transliterate(name: &str) -> String {
    Transliterator::global().transliterate(name)
}

fn shift(c: char, offset: i32) -> Option<char> {
    let code = u32::try_from(c as i32 + offset).ok()?;
    char::from_u32(code)
}

fn insert(table: &mut HashMap<char, char>, key: char, value: char) {
    if let Some(previous) = table.insert(key, value) {
        if previous != value {
            debug!(
                "Substitution key U+{:04X} remapped from {:?} to {:?}",
                key as u32, previous, value
            );
        }
    }
}
