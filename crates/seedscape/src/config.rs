//! # Application Configuration
//!
//! Optional TOML file; every key has a default. A missing file means
//! defaults, a broken one is an error (the caller decides whether to abort).
//!
//! ```toml
//! seed = "adventure"
//! spawn_radius = 300
//!
//! [terrain.height]
//! octaves = 5
//! scale = 0.015
//!
//! [map]
//! width = 64
//! height = 32
//!
//! [explorer]
//! speed = 4.2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use seedscape_procedural::{
    normalize_seed, FbmParams, SeedKey, TerrainParams, World, DEFAULT_SEED_TEXT,
    DEFAULT_SPAWN_RADIUS,
};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "seedscape.toml";

/// Per-key overrides on top of a field's built-in parameters.
///
/// Unset keys keep the value of the field being overridden, not the generic
/// [`FbmParams`] default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOverrides {
    /// Number of noise layers.
    pub octaves: Option<u32>,
    /// Frequency multiplier per octave.
    pub lacunarity: Option<f64>,
    /// Amplitude multiplier per octave.
    pub gain: Option<f64>,
    /// Base frequency.
    pub scale: Option<f64>,
    /// Warp displacement.
    pub warp_amp: Option<f64>,
    /// Warp frequency.
    pub warp_scale: Option<f64>,
}

impl FieldOverrides {
    /// Applies the set keys to `base`.
    #[must_use]
    pub fn apply(&self, base: FbmParams) -> FbmParams {
        FbmParams {
            octaves: self.octaves.unwrap_or(base.octaves),
            lacunarity: self.lacunarity.unwrap_or(base.lacunarity),
            gain: self.gain.unwrap_or(base.gain),
            scale: self.scale.unwrap_or(base.scale),
            warp_amp: self.warp_amp.unwrap_or(base.warp_amp),
            warp_scale: self.warp_scale.unwrap_or(base.warp_scale),
        }
    }
}

/// `[terrain]` section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainConfig {
    /// Height field overrides.
    pub height: FieldOverrides,
    /// Moisture field overrides.
    pub moisture: FieldOverrides,
    /// Replacement moisture sampling offset.
    pub moisture_offset: Option<(f64, f64)>,
}

impl TerrainConfig {
    /// Resolves the overrides against [`TerrainParams::default`].
    #[must_use]
    pub fn params(&self) -> TerrainParams {
        let base = TerrainParams::default();
        TerrainParams {
            height: self.height.apply(base.height),
            moisture: self.moisture.apply(base.moisture),
            moisture_offset: self.moisture_offset.unwrap_or(base.moisture_offset),
        }
    }
}

/// Text map dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 32,
        }
    }
}

/// Explorer movement tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Walking speed in tiles per second.
    pub speed: f64,
    /// Longest time step applied at once, in seconds.
    pub max_dt: f64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            speed: 4.2,
            max_dt: 0.05,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Seed text as a player would type it.
    pub seed: String,
    /// Use `seed` verbatim as the key instead of normalizing it.
    pub raw_seed: bool,
    /// Spiral search radius for spawning.
    pub spawn_radius: u32,
    /// Noise field overrides.
    pub terrain: TerrainConfig,
    /// Text map size.
    pub map: MapConfig,
    /// Explorer tuning.
    pub explorer: ExplorerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED_TEXT.to_owned(),
            raw_seed: false,
            spawn_radius: DEFAULT_SPAWN_RADIUS,
            terrain: TerrainConfig::default(),
            map: MapConfig::default(),
            explorer: ExplorerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`] or
    /// [`ConfigError::Terrain`] for unusable values.
    pub fn from_toml_str(text: &str, origin: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`AppConfig::from_toml_str`].
    pub fn load_from_path(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads an explicit file, or [`DEFAULT_CONFIG_PATH`] if it exists, or
    /// falls back to defaults.
    ///
    /// # Errors
    ///
    /// Any error from [`AppConfig::load_from_path`] for a file that exists.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.is_file() {
            Self::load_from_path(default_path)
        } else {
            debug!("No {DEFAULT_CONFIG_PATH} found, using defaults");
            Ok(Self::default())
        }
    }

    /// Checks values that serde cannot.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_toml_str`].
    pub fn validate(&self) -> ConfigResult<()> {
        self.terrain.params().validate()?;
        if self.map.width == 0 || self.map.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "map size must be non-zero, got {}x{}",
                self.map.width, self.map.height
            )));
        }
        if !self.explorer.speed.is_finite() || self.explorer.speed <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "explorer.speed must be positive, got {}",
                self.explorer.speed
            )));
        }
        if !self.explorer.max_dt.is_finite() || self.explorer.max_dt <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "explorer.max_dt must be positive, got {}",
                self.explorer.max_dt
            )));
        }
        Ok(())
    }

    /// The seed key this configuration selects.
    #[must_use]
    pub fn seed_key(&self) -> SeedKey {
        if self.raw_seed {
            SeedKey::new(self.seed.as_str())
        } else {
            normalize_seed(&self.seed)
        }
    }

    /// Builds the world this configuration describes.
    #[must_use]
    pub fn world(&self) -> World {
        World::with_params(self.seed_key(), self.terrain.params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ConfigResult<AppConfig> {
        AppConfig::from_toml_str(text, Path::new("test.toml"))
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse(
            r#"
            seed = "12345"
            spawn_radius = 50

            [terrain.height]
            octaves = 3

            [map]
            width = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.seed_key().as_str(), "12345");
        assert_eq!(config.spawn_radius, 50);
        let params = config.terrain.params();
        assert_eq!(params.height.octaves, 3);
        assert_eq!(params.height.scale, 0.015, "unset keys keep the height field's values");
        assert_eq!(params.height.warp_amp, 10.0);
        assert_eq!(params.moisture, TerrainParams::default().moisture);
        assert_eq!(config.map, MapConfig { width: 10, height: 32 });
    }

    #[test]
    fn test_default_config_builds_default_world() {
        let world = AppConfig::default().world();
        assert_eq!(world.params(), &TerrainParams::default());
        assert_eq!(world.seed().as_str(), "adventure:-694094064");
    }

    #[test]
    fn test_raw_seed_skips_normalization() {
        let config = parse("seed = \"adventure\"\nraw_seed = true").unwrap();
        assert_eq!(config.seed_key().as_str(), "adventure");
        let config = parse("seed = \"adventure\"").unwrap();
        assert_eq!(config.seed_key().as_str(), "adventure:-694094064");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(parse("sed = \"typo\""), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_invalid_terrain_rejected() {
        let err = parse("[terrain.moisture]\noctaves = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Terrain(_)), "got {err}");
    }

    #[test]
    fn test_invalid_explorer_rejected() {
        assert!(matches!(
            parse("[explorer]\nspeed = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(parse("[map]\nheight = 0"), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seedscape.toml");
        fs::write(&path, "seed = \"hello\"\n[map]\nwidth = 8\nheight = 4\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.seed_key().as_str(), "hello:99162322");
        assert_eq!(config.map, MapConfig { width: 8, height: 4 });
    }
}
