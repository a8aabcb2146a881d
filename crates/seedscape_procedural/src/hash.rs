//! # String Hashing
//!
//! Two independent string hashes, kept as separate named operations:
//!
//! - [`hash32`]: 32-bit FNV-1a, unsigned. Feeds every PRNG stream.
//! - [`java_string_hash`]: Java's `String.hashCode()`, signed. Used only for
//!   text seed normalization and shard rolls.
//!
//! The two are NOT interchangeable. They disagree on every non-trivial input
//! and on overflow semantics (unsigned vs. signed wraparound).
//!
//! ## Determinism Guarantee
//!
//! Both hashes walk UTF-16 code units and use exact 32-bit wrapping
//! arithmetic, so a given string hashes to the same value on every platform
//! and in every process. `std::hash` is never used here because its output is
//! not stable across releases.

/// FNV-1a 32-bit offset basis. Also the hash of the empty string.
pub const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;

/// FNV-1a 32-bit prime (16777619).
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Multiplier of the Java polynomial string hash.
const JAVA_HASH_MULTIPLIER: i32 = 31;

/// Hashes a string to a stable unsigned 32-bit value (FNV-1a).
///
/// Each UTF-16 code unit is XORed into the accumulator, which is then
/// multiplied by [`FNV_PRIME`] modulo 2^32.
///
/// # Example
///
/// ```
/// use seedscape_procedural::hash::{hash32, FNV_OFFSET_BASIS};
///
/// assert_eq!(hash32(""), FNV_OFFSET_BASIS);
/// assert_eq!(hash32("a"), 0xE40C_292C);
/// ```
#[inline]
#[must_use]
pub fn hash32(s: &str) -> u32 {
    s.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Java's `String.hashCode()`: `h = 31 * h + unit` with signed 32-bit overflow.
///
/// Kept for compatibility with the text-seed convention of Java-based games,
/// where typing the same text seed yields the same number. Long inputs wrap
/// around; the wrapped value is the contract.
///
/// # Example
///
/// ```
/// use seedscape_procedural::hash::java_string_hash;
///
/// assert_eq!(java_string_hash("hello"), 99_162_322);
/// assert_eq!(java_string_hash(""), 0);
/// ```
#[inline]
#[must_use]
pub fn java_string_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(JAVA_HASH_MULTIPLIER)
            .wrapping_add(i32::from(unit))
    })
}
