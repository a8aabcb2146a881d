//! # Item & Spawn Placement
//!
//! - Shards: a fixed-density, per-tile hashed roll. No global counter and no
//!   exclusion radius; each tile is decided on its own.
//! - Spawn: an outward square spiral from a centre tile, stopping at the
//!   first passable tile.

use serde::Serialize;
use tracing::debug;

use crate::hash::java_string_hash;
use crate::seed::SeedKey;
use crate::terrain::World;

/// Shard roll denominator. Prime, so roll outcomes do not repeat with
/// coordinate strides.
pub const SHARD_DENOMINATOR: u32 = 9973;

/// Shard roll numerator: a passable tile carries a shard with probability
/// `3 / 9973` (about 0.03%).
pub const SHARD_NUMERATOR: u32 = 3;

/// Search radius used when spawning a player into a new world.
pub const DEFAULT_SPAWN_RADIUS: u32 = 300;

/// Default search radius of [`World::spiral_find_passable`] callers.
pub const DEFAULT_SEARCH_RADIUS: u32 = 200;

/// The hashed shard roll for a tile, ignoring terrain.
///
/// Hashes `"{seed}|item|{tx},{ty}"` with [`java_string_hash`] and tests
/// `|hash| mod 9973 < 3`. `i32::MIN` has magnitude 2^31.
#[must_use]
pub fn shard_roll(seed: &SeedKey, tx: i64, ty: i64) -> bool {
    let hash = java_string_hash(&format!("{seed}|item|{tx},{ty}"));
    hash.unsigned_abs() % SHARD_DENOMINATOR < SHARD_NUMERATOR
}

/// Result of a spawn search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpawnPoint {
    /// X of the centre of the chosen tile.
    pub x: f64,
    /// Y of the centre of the chosen tile.
    pub y: f64,
    /// `false` when no passable tile was in range and the centre was used.
    pub found: bool,
}

impl SpawnPoint {
    /// Integer tile containing this point.
    #[inline]
    #[must_use]
    pub fn tile(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

/// Offsets of an outward square spiral, starting at `(0, 0)`.
///
/// Visit order: `(0,0) (1,0) (1,1) (0,1) (-1,1) (-1,0) (-1,-1) (0,-1) (1,-1) (2,-1) ...`.
/// The walker turns 90 degrees at each corner, so side lengths grow
/// 1, 1, 2, 2, 3, 3, ...
#[derive(Clone, Debug)]
pub struct SpiralCells {
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
}

impl SpiralCells {
    /// Starts a new spiral at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            dx: 0,
            dy: -1,
        }
    }
}

impl Default for SpiralCells {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for SpiralCells {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<(i64, i64)> {
        let current = (self.x, self.y);
        let (x, y) = current;
        if x == y || (x < 0 && x == -y) || (x > 0 && x == 1 - y) {
            (self.dx, self.dy) = (-self.dy, self.dx);
        }
        self.x += self.dx;
        self.y += self.dy;
        Some(current)
    }
}

impl World {
    /// Whether the tile carries a shard.
    ///
    /// Impassable tiles never do.
    #[must_use]
    pub fn has_shard_at(&self, tx: i64, ty: i64) -> bool {
        self.tile_at(tx, ty).passable && shard_roll(self.seed(), tx, ty)
    }

    /// Finds the passable tile nearest to `(cx, cy)` along a square spiral.
    ///
    /// At most `max_radius²` tiles are tested. Returns the centre of the first
    /// passable tile, or the centre of `(cx, cy)` with `found == false` if
    /// none was in range. Never fails; the search wraps around the ends of
    /// the `i64` range.
    #[must_use]
    pub fn spiral_find_passable(&self, cx: i64, cy: i64, max_radius: u32) -> SpawnPoint {
        let steps = u64::from(max_radius) * u64::from(max_radius);
        let hit = SpiralCells::new()
            .take(usize::try_from(steps).unwrap_or(usize::MAX))
            .map(|(dx, dy)| (cx.wrapping_add(dx), cy.wrapping_add(dy)))
            .enumerate()
            .find(|&(_, (tx, ty))| self.tile_at(tx, ty).passable);

        match hit {
            Some((step, (tx, ty))) => {
                debug!(seed = %self.seed(), step, tx, ty, "spawn tile found");
                SpawnPoint {
                    x: tx as f64 + 0.5,
                    y: ty as f64 + 0.5,
                    found: true,
                }
            }
            None => {
                debug!(
                    seed = %self.seed(),
                    cx,
                    cy,
                    max_radius,
                    "no passable tile in range, using centre"
                );
                SpawnPoint {
                    x: cx as f64 + 0.5,
                    y: cy as f64 + 0.5,
                    found: false,
                }
            }
        }
    }

    /// Spawn point for a fresh world: spiral from the origin with
    /// [`DEFAULT_SPAWN_RADIUS`].
    #[must_use]
    pub fn spawn_point(&self) -> SpawnPoint {
        self.spiral_find_passable(0, 0, DEFAULT_SPAWN_RADIUS)
    }
}

/// Shard test for the world keyed by `seed`, with default parameters.
#[must_use]
pub fn has_shard_at(seed: &SeedKey, tx: i64, ty: i64) -> bool {
    World::new(seed.clone()).has_shard_at(tx, ty)
}

/// Spawn search for the world keyed by `seed`, with default parameters.
#[must_use]
pub fn spiral_find_passable(seed: &SeedKey, cx: i64, cy: i64, max_radius: u32) -> SpawnPoint {
    World::new(seed.clone()).spiral_find_passable(cx, cy, max_radius)
}
