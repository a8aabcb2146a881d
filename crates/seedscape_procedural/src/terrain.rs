//! # Terrain Classification
//!
//! Maps two independent noise fields, height and moisture, to a tile kind.
//!
//! ## Thresholds
//!
//! | Height `h`                 | Kind                                  |
//! |----------------------------|---------------------------------------|
//! | `h < 0.408`                | deep water                            |
//! | `0.408 <= h < 0.48`        | shallow water                         |
//! | `0.48 <= h < 0.50`         | sand                                  |
//! | `0.50 <= h <= 0.82`        | forest if moisture `> 0.55`, else grass |
//! | `0.82 < h <= 0.92`         | rock                                  |
//! | `h > 0.92`                 | snow                                  |
//!
//! A value exactly on a threshold falls into the lower band for the water
//! and sand cuts, and stays in the land band at the mountain cut. These
//! cut points are fixed; worlds are only reproducible if they never change.

use serde::{Deserialize, Serialize};

use crate::error::ProceduralResult;
use crate::noise::{FbmParams, NoiseField};
use crate::seed::SeedKey;

/// Below this height: water.
pub const WATER_T: f64 = 0.48;

/// Below this height (and at least [`WATER_T`]): sand shoreline.
pub const SHALLOW_T: f64 = 0.50;

/// Above this height: rock.
pub const MOUNTAIN_T: f64 = 0.82;

/// Above this height: snow.
pub const SNOW_T: f64 = 0.92;

/// Below this height: deep rather than shallow water.
pub const DEEP_WATER_T: f64 = WATER_T * 0.85;

/// Above this moisture, land-band tiles are forest.
pub const FOREST_MOISTURE_T: f64 = 0.55;

/// Terrain kind of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TileKind {
    /// Open water far from shore.
    DeepWater = 0,
    /// Water near the shoreline.
    ShallowWater = 1,
    /// Beach.
    Sand = 2,
    /// Dry lowland.
    Grass = 3,
    /// Moist lowland.
    Forest = 4,
    /// Mountain.
    Rock = 5,
    /// Mountain peak.
    Snow = 6,
}

impl TileKind {
    /// All kinds, in height order.
    pub const ALL: [Self; 7] = [
        Self::DeepWater,
        Self::ShallowWater,
        Self::Sand,
        Self::Grass,
        Self::Forest,
        Self::Rock,
        Self::Snow,
    ];

    /// Whether a walker may enter a tile of this kind.
    #[inline]
    #[must_use]
    pub const fn passable(self) -> bool {
        matches!(self, Self::Sand | Self::Grass | Self::Forest)
    }

    /// Whether this is one of the two water kinds.
    #[inline]
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::DeepWater | Self::ShallowWater)
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DeepWater => "deep_water",
            Self::ShallowWater => "shallow_water",
            Self::Sand => "sand",
            Self::Grass => "grass",
            Self::Forest => "forest",
            Self::Rock => "rock",
            Self::Snow => "snow",
        }
    }

    /// Biome name, with both water depths reported as `"water"`.
    #[must_use]
    pub const fn biome(self) -> &'static str {
        if self.is_water() {
            "water"
        } else {
            self.name()
        }
    }
}

/// Classifies a tile from its height and moisture samples.
///
/// # Example
///
/// ```
/// use seedscape_procedural::terrain::{classify, TileKind, WATER_T};
///
/// assert_eq!(classify(WATER_T, 0.0), TileKind::Sand);
/// assert_eq!(classify(0.6, 0.9), TileKind::Forest);
/// ```
#[must_use]
pub fn classify(height: f64, moisture: f64) -> TileKind {
    if height < WATER_T {
        return if height < DEEP_WATER_T {
            TileKind::DeepWater
        } else {
            TileKind::ShallowWater
        };
    }
    if height < SHALLOW_T {
        return TileKind::Sand;
    }
    if height > MOUNTAIN_T {
        return if height > SNOW_T {
            TileKind::Snow
        } else {
            TileKind::Rock
        };
    }
    if moisture > FOREST_MOISTURE_T {
        TileKind::Forest
    } else {
        TileKind::Grass
    }
}

/// Classification result for one integer coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Tile {
    /// Terrain kind.
    pub kind: TileKind,
    /// Whether a walker may enter this tile.
    pub passable: bool,
    /// Height sample the kind was derived from.
    pub height: f64,
    /// Moisture sample the kind was derived from.
    pub moisture: f64,
}

impl Tile {
    /// Builds a tile from its two field samples.
    #[inline]
    #[must_use]
    pub fn from_samples(height: f64, moisture: f64) -> Self {
        let kind = classify(height, moisture);
        Self {
            kind,
            passable: kind.passable(),
            height,
            moisture,
        }
    }
}

/// Field parameters of a world.
///
/// Deserializing requires every field; partial overrides belong to the
/// caller's configuration layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerrainParams {
    /// Height field.
    pub height: FbmParams,
    /// Moisture field.
    pub moisture: FbmParams,
    /// Offset added to tile coordinates before sampling moisture.
    ///
    /// Moves the moisture samples far away from the height samples so the
    /// two fields stay decorrelated.
    pub moisture_offset: (f64, f64),
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            height: FbmParams::default().with_scale(0.015).with_warp(10.0, 0.008),
            moisture: FbmParams::default().with_octaves(4).with_scale(0.03),
            moisture_offset: (1000.0, -1000.0),
        }
    }
}

impl TerrainParams {
    /// Validates both fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::ProceduralError::InvalidParams`] found.
    pub fn validate(&self) -> ProceduralResult<()> {
        self.height.validate()?;
        self.moisture.validate()
    }
}

/// A generated world: a seed key plus field parameters.
///
/// Immutable and `Send + Sync`; share it freely between threads. Every
/// query recomputes from scratch. Callers that revisit tiles may memoize.
///
/// Coordinates must be finite. Results for NaN or infinite input are
/// unspecified.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    seed: SeedKey,
    params: TerrainParams,
    height: NoiseField,
    moisture: NoiseField,
}

impl World {
    /// Creates a world with the default field parameters.
    #[must_use]
    pub fn new(seed: SeedKey) -> Self {
        Self::with_params(seed, TerrainParams::default())
    }

    /// Creates a world with custom field parameters.
    #[must_use]
    pub fn with_params(seed: SeedKey, params: TerrainParams) -> Self {
        let height = NoiseField::new(seed.field("h"), params.height);
        let moisture = NoiseField::new(seed.field("m"), params.moisture);
        Self {
            seed,
            params,
            height,
            moisture,
        }
    }

    /// The seed key of this world.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> &SeedKey {
        &self.seed
    }

    /// The field parameters of this world.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Height field value in `[0, 1]` at a tile.
    #[inline]
    #[must_use]
    pub fn height_at(&self, tx: i64, ty: i64) -> f64 {
        self.height.sample(tx as f64, ty as f64)
    }

    /// Moisture field value in `[0, 1]` at a tile.
    #[inline]
    #[must_use]
    pub fn moisture_at(&self, tx: i64, ty: i64) -> f64 {
        let (ox, oy) = self.params.moisture_offset;
        self.moisture.sample(tx as f64 + ox, ty as f64 + oy)
    }

    /// Classifies the tile at integer coordinates.
    #[must_use]
    pub fn tile_at(&self, tx: i64, ty: i64) -> Tile {
        Tile::from_samples(self.height_at(tx, ty), self.moisture_at(tx, ty))
    }

    /// Passability of the tile containing a real-valued position.
    ///
    /// The position is floored to its tile, so `(2.9, -0.1)` tests `(2, -1)`.
    #[must_use]
    pub fn is_passable_at(&self, x: f64, y: f64) -> bool {
        debug_assert!(x.is_finite() && y.is_finite(), "non-finite position ({x}, {y})");
        self.tile_at(x.floor() as i64, y.floor() as i64).passable
    }
}

/// Classifies a tile of the world keyed by `seed`, with default parameters.
#[must_use]
pub fn tile_at(seed: &SeedKey, tx: i64, ty: i64) -> Tile {
    World::new(seed.clone()).tile_at(tx, ty)
}
