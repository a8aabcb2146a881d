//! # Region Sampling
//!
//! Bulk evaluation of a rectangle of tiles. Rows are independent, so they are
//! sampled in parallel with no coordination; the output order is row-major
//! regardless of scheduling.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::{ProceduralError, ProceduralResult};
use crate::placement::{shard_roll, SHARD_DENOMINATOR, SHARD_NUMERATOR};
use crate::terrain::{Tile, TileKind, World};

/// Largest region accepted by [`Region::new`] (16M tiles).
pub const MAX_REGION_TILES: u64 = 1 << 24;

/// A rectangle of tiles, `x..x+width` by `y..y+height`.
///
/// Coordinates wrap at the ends of the `i64` range, so a region near
/// `i64::MAX` continues at `i64::MIN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
    /// Left tile column.
    pub x: i64,
    /// Top tile row.
    pub y: i64,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
}

impl Region {
    /// Creates a region anchored at its top-left tile.
    ///
    /// # Errors
    ///
    /// [`ProceduralError::EmptyRegion`] for a zero dimension,
    /// [`ProceduralError::RegionTooLarge`] above [`MAX_REGION_TILES`].
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> ProceduralResult<Self> {
        if width == 0 || height == 0 {
            return Err(ProceduralError::EmptyRegion { width, height });
        }
        let tiles = u64::from(width) * u64::from(height);
        if tiles > MAX_REGION_TILES {
            return Err(ProceduralError::RegionTooLarge {
                tiles,
                max: MAX_REGION_TILES,
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Creates a region whose centre tile is `(cx, cy)`.
    ///
    /// # Errors
    ///
    /// Same as [`Region::new`].
    pub fn centered(cx: i64, cy: i64, width: u32, height: u32) -> ProceduralResult<Self> {
        Self::new(
            cx.wrapping_sub(i64::from(width / 2)),
            cy.wrapping_sub(i64::from(height / 2)),
            width,
            height,
        )
    }

    /// Number of tiles in the region.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Always `false`; regions are validated to be non-empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a tile lies inside the region.
    #[inline]
    #[must_use]
    pub fn contains(&self, tx: i64, ty: i64) -> bool {
        (tx.wrapping_sub(self.x) as u64) < u64::from(self.width)
            && (ty.wrapping_sub(self.y) as u64) < u64::from(self.height)
    }

    /// Tile coordinates of row `row`, left to right.
    pub fn row(&self, row: u32) -> impl Iterator<Item = (i64, i64)> {
        let y = self.y.wrapping_add(i64::from(row));
        let x0 = self.x;
        (0..i64::from(self.width)).map(move |dx| (x0.wrapping_add(dx), y))
    }

    /// All tile coordinates, row-major.
    pub fn coords(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        (0..self.height).flat_map(move |row| self.row(row))
    }
}

/// Tile counts per kind over a region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BiomeHistogram {
    counts: BTreeMap<TileKind, u64>,
    total: u64,
}

impl BiomeHistogram {
    /// Builds a histogram from sampled tiles.
    #[must_use]
    pub fn from_tiles(tiles: &[Tile]) -> Self {
        let mut histogram = Self::default();
        for tile in tiles {
            histogram.record(tile.kind);
        }
        histogram
    }

    /// Counts one tile.
    pub fn record(&mut self, kind: TileKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
        self.total += 1;
    }

    /// Tiles of a kind.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Total tiles counted.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Passable tiles counted.
    #[must_use]
    pub fn passable(&self) -> u64 {
        self.counts
            .iter()
            .filter(|(kind, _)| kind.passable())
            .map(|(_, count)| count)
            .sum()
    }

    /// Share of a kind in `[0, 1]`; `0` for an empty histogram.
    #[must_use]
    pub fn fraction(&self, kind: TileKind) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(kind) as f64 / self.total as f64
        }
    }

    /// `(kind, count)` pairs in height order, zero counts omitted.
    pub fn iter(&self) -> impl Iterator<Item = (TileKind, u64)> + '_ {
        self.counts.iter().map(|(&kind, &count)| (kind, count))
    }
}

/// Expected shards among `passable` tiles: `passable * 3 / 9973`.
#[must_use]
pub fn expected_shards(passable: u64) -> f64 {
    passable as f64 * f64::from(SHARD_NUMERATOR) / f64::from(SHARD_DENOMINATOR)
}

impl World {
    /// Classifies every tile of a region, row-major.
    #[must_use]
    pub fn sample_region(&self, region: &Region) -> Vec<Tile> {
        debug!(seed = %self.seed(), ?region, "sampling region");
        (0..region.height)
            .into_par_iter()
            .flat_map_iter(|row| region.row(row).map(|(tx, ty)| self.tile_at(tx, ty)))
            .collect()
    }

    /// Shard tiles of a region, row-major.
    #[must_use]
    pub fn shards_in(&self, region: &Region) -> Vec<(i64, i64)> {
        let tiles = self.sample_region(region);
        region
            .coords()
            .zip(tiles)
            .filter(|&((tx, ty), tile)| tile.passable && shard_roll(self.seed(), tx, ty))
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Biome histogram of a region.
    #[must_use]
    pub fn histogram(&self, region: &Region) -> BiomeHistogram {
        BiomeHistogram::from_tiles(&self.sample_region(region))
    }
}
