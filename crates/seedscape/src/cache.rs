//! # Tile Cache
//!
//! Memoizes classified tiles of one [`World`]. Generation is pure, so a
//! cached tile is always identical to a fresh one; the cache only saves the
//! noise evaluation when the explorer or a map revisits coordinates.
//!
//! Shared freely between threads: reads take a `parking_lot` read lock,
//! misses are computed outside any lock and inserted afterwards.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use seedscape_procedural::{shard_roll, Region, Tile, World};
use serde::Serialize;
use tracing::debug;

/// Hit/miss counters of a [`TileCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to generate the tile.
    pub misses: u64,
    /// Tiles currently stored.
    pub entries: usize,
}

/// Memoizing tile lookup over a [`World`].
pub struct TileCache {
    world: World,
    tiles: RwLock<HashMap<(i64, i64), Tile>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TileCache {
    /// Creates an empty cache over `world`.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            world,
            tiles: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The underlying world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Tile at integer coordinates.
    #[must_use]
    pub fn tile_at(&self, tx: i64, ty: i64) -> Tile {
        if let Some(tile) = self.tiles.read().get(&(tx, ty)) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return *tile;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let tile = self.world.tile_at(tx, ty);
        self.tiles.write().insert((tx, ty), tile);
        tile
    }

    /// Whether the tile containing a continuous position is passable.
    #[must_use]
    pub fn is_passable_at(&self, x: f64, y: f64) -> bool {
        self.tile_at(x.floor() as i64, y.floor() as i64).passable
    }

    /// Whether a shard lies on a tile.
    #[must_use]
    pub fn has_shard_at(&self, tx: i64, ty: i64) -> bool {
        self.tile_at(tx, ty).passable && shard_roll(self.world.seed(), tx, ty)
    }

    /// Generates every tile of a region in parallel and stores them.
    ///
    /// Returns the tiles row-major, as [`World::sample_region`] does.
    pub fn prefetch(&self, region: &Region) -> Vec<Tile> {
        let tiles = self.world.sample_region(region);
        let mut map = self.tiles.write();
        map.reserve(tiles.len());
        for (coord, tile) in region.coords().zip(&tiles) {
            map.insert(coord, *tile);
        }
        debug!(tiles = tiles.len(), entries = map.len(), "prefetched region");
        tiles
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.tiles.read().len(),
        }
    }

    /// Drops every cached tile. Counters are kept.
    pub fn clear(&self) {
        self.tiles.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use seedscape_procedural::SeedKey;

    use super::*;

    fn adventure() -> TileCache {
        TileCache::new(World::new(SeedKey::new("adventure")))
    }

    #[test]
    fn test_cached_tile_matches_world() {
        let cache = adventure();
        for (tx, ty) in [(0, 0), (-18, 5), (144, 26), (-1000, 999)] {
            assert_eq!(cache.tile_at(tx, ty), cache.world().tile_at(tx, ty));
            assert_eq!(cache.tile_at(tx, ty), cache.world().tile_at(tx, ty));
        }
        let stats = cache.stats();
        assert_eq!(stats.misses, 4);
        assert_eq!(stats.hits, 4);
        assert_eq!(stats.entries, 4);
    }

    #[test]
    fn test_prefetch_fills_region() {
        let cache = adventure();
        let region = Region::new(-5, -5, 10, 10).unwrap();
        let tiles = cache.prefetch(&region);
        assert_eq!(tiles.len(), 100);
        assert_eq!(cache.stats().entries, 100);

        let _ = cache.tile_at(-5, -5);
        let _ = cache.tile_at(4, 4);
        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_shards_match_world() {
        let cache = adventure();
        assert!(cache.has_shard_at(144, 26));
        assert!(!cache.has_shard_at(0, 0));
        assert_eq!(cache.has_shard_at(49, 90), cache.world().has_shard_at(49, 90));
    }

    #[test]
    fn test_passable_floors_position() {
        let cache = adventure();
        assert!(cache.is_passable_at(-18.5, 5.5));
        assert!(!cache.is_passable_at(0.5, 0.5));
        assert_eq!(cache.is_passable_at(-0.01, 0.0), cache.tile_at(-1, 0).passable);
    }

    #[test]
    fn test_clear_keeps_counters() {
        let cache = adventure();
        let _ = cache.tile_at(1, 1);
        cache.clear();
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1, entries: 0 });
    }

    #[test]
    fn test_shared_between_threads() {
        let cache = adventure();
        std::thread::scope(|scope| {
            for t in 0..4 {
                let cache = &cache;
                scope.spawn(move || {
                    for i in 0..50 {
                        let tile = cache.tile_at(i, t);
                        assert_eq!(tile, cache.world().tile_at(i, t));
                    }
                });
            }
        });
        assert_eq!(cache.stats().entries, 200);
    }
}
