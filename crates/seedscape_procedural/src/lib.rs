//! # SEEDSCAPE Procedural Generation
//!
//! Deterministic tile worlds from a text or numeric seed.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed key always produces the same world
//! 2. **Stateless**: Every query is a pure function of (seed, coordinate)
//! 3. **Portable**: Hashing and PRNG use exact 32-bit wrapping arithmetic
//! 4. **Parallel-friendly**: Tiles can be evaluated from any thread, in any order
//!
//! ## Core Components
//!
//! - `hash32` / `java_string_hash`: stable string hashes
//! - `Mulberry32` / `rand_2d`: seeded streams and lattice scalars
//! - `value_noise_2d` / `fbm_2d`: smooth, domain-warped fractal noise
//! - `World`: terrain classification, shard placement, spawn search
//! - `Region`: parallel bulk sampling and biome statistics
//!
//! ## Example
//!
//! ```rust
//! use seedscape_procedural::{normalize_seed, World};
//!
//! let world = World::new(normalize_seed("adventure"));
//!
//! let spawn = world.spawn_point();
//! let (tx, ty) = spawn.tile();
//! assert!(!spawn.found || world.tile_at(tx, ty).passable);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

pub mod error;
pub mod hash;
pub mod noise;
pub mod placement;
pub mod random;
pub mod region;
pub mod seed;
pub mod terrain;

pub use error::{ProceduralError, ProceduralResult};
pub use hash::{hash32, java_string_hash};
pub use noise::{domain_warp, fbm_2d, value_noise_2d, FbmParams, NoiseField};
pub use placement::{
    has_shard_at, shard_roll, spiral_find_passable, SpawnPoint, SpiralCells,
    DEFAULT_SEARCH_RADIUS, DEFAULT_SPAWN_RADIUS, SHARD_DENOMINATOR, SHARD_NUMERATOR,
};
pub use random::{rand_2d, rng_from, Mulberry32};
pub use region::{expected_shards, BiomeHistogram, Region};
pub use seed::{normalize_seed, SeedKey, DEFAULT_SEED_TEXT};
pub use terrain::{classify, tile_at, TerrainParams, Tile, TileKind, World};
