//! # Seed Keys
//!
//! A world is identified by a canonical string, the [`SeedKey`]. Every field
//! and placement test derives its own context string from it, so a key fully
//! determines the world.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::java_string_hash;

/// Seed used when the player leaves the seed field empty.
pub const DEFAULT_SEED_TEXT: &str = "adventure";

/// Canonical seed string that determines all procedural output for a world.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedKey(String);

impl SeedKey {
    /// Wraps an already-canonical key verbatim.
    ///
    /// Use [`normalize_seed`] for text typed by a player.
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the key of a named sub-field (`"{key}:{field}"`).
    ///
    /// Height and moisture use `h` and `m`, which makes the two fields
    /// independent even though they share one base seed.
    #[inline]
    #[must_use]
    pub fn field(&self, field: &str) -> String {
        format!("{}:{field}", self.0)
    }
}

impl Default for SeedKey {
    fn default() -> Self {
        normalize_seed(DEFAULT_SEED_TEXT)
    }
}

impl fmt::Display for SeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SeedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SeedKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SeedKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Converts player input into a seed key.
///
/// - Empty input selects [`DEFAULT_SEED_TEXT`] verbatim.
/// - Input that is a decimal integer once trimmed (optional `+`/`-` sign) is
///   kept as the trimmed text.
/// - Anything else keeps the text for display and appends its Java string
///   hash: `"{input}:{hash}"`, so text seeds match the Java convention.
///
/// # Example
///
/// ```
/// use seedscape_procedural::seed::normalize_seed;
///
/// assert_eq!(normalize_seed(" 123 ").as_str(), "123");
/// assert_eq!(normalize_seed("adventure").as_str(), "adventure:-694094064");
/// ```
#[must_use]
pub fn normalize_seed(raw: &str) -> SeedKey {
    if raw.is_empty() {
        return SeedKey::new(DEFAULT_SEED_TEXT);
    }
    let trimmed = raw.trim();
    if is_decimal_integer(trimmed) {
        return SeedKey::new(trimmed);
    }
    SeedKey(format!("{raw}:{}", java_string_hash(raw)))
}

/// `^[+-]?[0-9]+$`
fn is_decimal_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
