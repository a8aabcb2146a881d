//! # Seeded Random Streams
//!
//! Mulberry32 PRNG plus the helpers that bridge string contexts and lattice
//! points to deterministic scalars.
//!
//! ## Determinism Guarantee
//!
//! Mulberry32 is defined over unsigned 32-bit integers. Every step here uses
//! `u32` wrapping arithmetic; reproducing the stream with signed or
//! arbitrary-precision integers produces different values.

use crate::hash::hash32;

/// Per-step state increment (odd, so the state walks all 2^32 values).
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;

/// 2^32, the divisor mapping a mixed `u32` into [0, 1).
const U32_RANGE: f64 = 4_294_967_296.0;

/// Mulberry32 pseudo-random stream.
///
/// Yields `f64` values in `[0, 1)`. The same seed always yields the same
/// infinite sequence; the stream is never reseeded.
///
/// # Example
///
/// ```
/// use seedscape_procedural::random::Mulberry32;
///
/// let mut a = Mulberry32::new(42);
/// let mut b = Mulberry32::new(42);
/// assert_eq!(a.next_f64(), b.next_f64());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Creates a stream from a 32-bit seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advances the stream and returns the next value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_RANGE
    }

    /// Advances the stream and returns the raw mixed 32-bit output.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }
}

impl Iterator for Mulberry32 {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Mints a one-off stream from any string context: `Mulberry32(hash32(key))`.
#[inline]
#[must_use]
pub fn rng_from(key: &str) -> Mulberry32 {
    Mulberry32::new(hash32(key))
}

/// Deterministic scalar in `[0, 1)` for a lattice point of a named field.
///
/// The context string is `"{seed}:{ix}|{iy}"`; the `|` keeps `(1, 23)` and
/// `(12, 3)` apart. All noise and placement code goes through here.
///
/// Indices are formatted as exact decimal integers. Lattice indices of
/// magnitude `2^53` or more (sample points beyond about `9e15 / scale`)
/// therefore produce keys that a float-formatting implementation would
/// render differently; worlds only agree across implementations below that.
#[inline]
#[must_use]
pub fn rand_2d(seed: &str, ix: i64, iy: i64) -> f64 {
    rng_from(&format!("{seed}:{ix}|{iy}")).next_f64()
}
