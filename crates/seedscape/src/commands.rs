//! # Commands
//!
//! Executes a parsed [`Command`] against a [`Session`] and renders the
//! result as text or JSON. Every report is a plain `Serialize` struct with a
//! `Display` impl for the text form.

use std::fmt;

use anyhow::{bail, Context, Result};
use seedscape_procedural::{
    expected_shards, shard_roll, BiomeHistogram, Region, SeedKey, TileKind,
};
use serde::Serialize;
use tracing::debug;

use crate::ascii::{legend, render_map, MapMarkers};
use crate::cache::{CacheStats, TileCache};
use crate::cli::{Cli, Command, RegionArgs};
use crate::config::AppConfig;
use crate::explorer::{parse_script, Explorer, ExplorerState};
use crate::palette;

/// Resolved configuration plus a tile cache over the selected world.
pub struct Session {
    config: AppConfig,
    cache: TileCache,
}

impl Session {
    /// Builds a session from a validated configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let cache = TileCache::new(config.world());
        debug!(seed = %cache.world().seed(), "session ready");
        Self { config, cache }
    }

    /// Loads the configuration named by the command line and applies the
    /// seed overrides.
    ///
    /// # Errors
    ///
    /// Fails if an explicit or default configuration file cannot be loaded.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
        if let Some(seed) = &cli.seed {
            config.seed.clone_from(seed);
        }
        config.raw_seed |= cli.raw_seed;
        Ok(Self::new(config))
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The tile cache of the active world.
    #[must_use]
    pub const fn cache(&self) -> &TileCache {
        &self.cache
    }

    fn seed(&self) -> &SeedKey {
        self.cache.world().seed()
    }

    fn region(&self, args: &RegionArgs) -> Result<Region> {
        let width = args.width.unwrap_or(self.config.map.width);
        let height = args.height.unwrap_or(self.config.map.height);
        Region::centered(args.cx, args.cy, width, height).with_context(|| {
            format!("invalid region {width}x{height} around ({}, {})", args.cx, args.cy)
        })
    }
}

/// Runs a whole command line: loads the session, executes, renders.
///
/// # Errors
///
/// Configuration, region, script and serialization failures.
pub fn execute(cli: &Cli) -> Result<String> {
    let session = Session::from_cli(cli)?;
    run(&session, &cli.command, cli.json)
}

/// Executes one command in an existing session.
///
/// # Errors
///
/// See [`execute`].
pub fn run(session: &Session, command: &Command, json: bool) -> Result<String> {
    match command {
        Command::Seed => render(&seed_report(session), json),
        Command::Tile { x, y } => render(&tile_report(session, *x, *y), json),
        Command::Spawn { radius } => render(&spawn_report(session, *radius), json),
        Command::Map { region, legend } => render(&map_report(session, region, *legend)?, json),
        Command::Shards { region } => render(&shards_report(session, region)?, json),
        Command::Stats { region } => render(&stats_report(session, region)?, json),
        Command::Walk { moves, dt, map } => render(&walk_report(session, moves, *dt, *map)?, json),
    }
}

fn render<R: Serialize + fmt::Display>(report: &R, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(report).context("serializing report")
    } else {
        Ok(report.to_string())
    }
}

// ============================================================================
// SEED
// ============================================================================

/// Seed text and the world key it selects.
#[derive(Debug, Serialize)]
pub struct SeedReport {
    /// Text as given.
    pub input: String,
    /// World key.
    pub key: String,
    /// Whether normalization was skipped.
    pub raw: bool,
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Builds the `seed` report.
#[must_use]
pub fn seed_report(session: &Session) -> SeedReport {
    SeedReport {
        input: session.config.seed.clone(),
        key: session.seed().as_str().to_owned(),
        raw: session.config.raw_seed,
    }
}

// ============================================================================
// TILE
// ============================================================================

/// Everything known about one tile.
#[derive(Debug, Serialize)]
pub struct TileReport {
    /// Tile column.
    pub x: i64,
    /// Tile row.
    pub y: i64,
    /// Terrain kind.
    pub kind: TileKind,
    /// Biome name (both water depths are `water`).
    pub biome: &'static str,
    /// Whether the explorer may enter.
    pub passable: bool,
    /// Height sample.
    pub height: f64,
    /// Moisture sample.
    pub moisture: f64,
    /// Display colour.
    pub color: &'static str,
    /// Whether a shard lies here.
    pub shard: bool,
}

impl fmt::Display for TileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tile ({}, {}): {} ({})", self.x, self.y, self.kind.name(), self.biome)?;
        writeln!(f, "  passable: {}", yes_no(self.passable))?;
        writeln!(f, "  height:   {:.6}", self.height)?;
        writeln!(f, "  moisture: {:.6}", self.moisture)?;
        writeln!(f, "  color:    {}", self.color)?;
        write!(f, "  shard:    {}", yes_no(self.shard))
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Builds the `tile` report.
#[must_use]
pub fn tile_report(session: &Session, x: i64, y: i64) -> TileReport {
    let tile = session.cache.tile_at(x, y);
    TileReport {
        x,
        y,
        kind: tile.kind,
        biome: tile.kind.biome(),
        passable: tile.passable,
        height: tile.height,
        moisture: tile.moisture,
        color: palette::color(tile.kind),
        shard: session.cache.has_shard_at(x, y),
    }
}

// ============================================================================
// SPAWN
// ============================================================================

/// Spawn search outcome.
#[derive(Debug, Serialize)]
pub struct SpawnReport {
    /// X of the spawn point.
    pub x: f64,
    /// Y of the spawn point.
    pub y: f64,
    /// Tile containing the spawn point.
    pub tile: (i64, i64),
    /// `false` when the search fell back to the origin.
    pub found: bool,
    /// Search radius used.
    pub radius: u32,
}

impl fmt::Display for SpawnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.found {
            write!(
                f,
                "spawn ({}, {}) on tile ({}, {})",
                self.x, self.y, self.tile.0, self.tile.1
            )
        } else {
            write!(
                f,
                "no passable tile within radius {}, falling back to ({}, {})",
                self.radius, self.x, self.y
            )
        }
    }
}

/// Builds the `spawn` report.
#[must_use]
pub fn spawn_report(session: &Session, radius: Option<u32>) -> SpawnReport {
    let radius = radius.unwrap_or(session.config.spawn_radius);
    let spawn = session.cache.world().spiral_find_passable(0, 0, radius);
    SpawnReport {
        x: spawn.x,
        y: spawn.y,
        tile: spawn.tile(),
        found: spawn.found,
        radius,
    }
}

// ============================================================================
// MAP
// ============================================================================

/// A rendered text map.
#[derive(Debug, Serialize)]
pub struct MapReport {
    /// Area drawn.
    pub region: Region,
    /// One string per row, north first.
    pub rows: Vec<String>,
    /// Spawn tile, when it lies inside the region.
    pub spawn: Option<(i64, i64)>,
    /// Glyph legend, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
}

impl fmt::Display for MapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        if let Some(legend) = &self.legend {
            write!(f, "{legend}")?;
        }
        Ok(())
    }
}

/// Builds the `map` report. The spawn point is drawn as the explorer.
///
/// # Errors
///
/// Invalid region dimensions.
pub fn map_report(session: &Session, args: &RegionArgs, with_legend: bool) -> Result<MapReport> {
    let region = session.region(args)?;
    let spawn = session
        .cache
        .world()
        .spiral_find_passable(0, 0, session.config.spawn_radius);
    let spawn_tile = spawn.tile();
    let spawn = (spawn.found && region.contains(spawn_tile.0, spawn_tile.1)).then_some(spawn_tile);

    let markers = MapMarkers {
        player: spawn,
        collected: None,
        shards: true,
    };
    let text = render_map(&session.cache, &region, &markers);
    Ok(MapReport {
        region,
        rows: text.lines().map(str::to_owned).collect(),
        spawn,
        legend: with_legend.then(legend),
    })
}

// ============================================================================
// SHARDS / STATS
// ============================================================================

/// Shard tiles in a region.
#[derive(Debug, Serialize)]
pub struct ShardsReport {
    /// Area searched.
    pub region: Region,
    /// Passable tiles in the area.
    pub passable: u64,
    /// Shard tiles, row-major.
    pub shards: Vec<(i64, i64)>,
}

impl fmt::Display for ShardsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} shards in {}x{} at ({}, {})",
            self.shards.len(),
            self.region.width,
            self.region.height,
            self.region.x,
            self.region.y
        )?;
        for (tx, ty) in &self.shards {
            write!(f, "\n  ({tx}, {ty})")?;
        }
        Ok(())
    }
}

/// Samples a region once, returning its histogram and shard tiles.
fn survey(session: &Session, region: &Region) -> (BiomeHistogram, Vec<(i64, i64)>) {
    let tiles = session.cache.prefetch(region);
    let seed = session.seed();
    let shards = region
        .coords()
        .zip(&tiles)
        .filter(|&((tx, ty), tile)| tile.passable && shard_roll(seed, tx, ty))
        .map(|(coord, _)| coord)
        .collect();
    (BiomeHistogram::from_tiles(&tiles), shards)
}

/// Builds the `shards` report.
///
/// # Errors
///
/// Invalid region dimensions.
pub fn shards_report(session: &Session, args: &RegionArgs) -> Result<ShardsReport> {
    let region = session.region(args)?;
    let (histogram, shards) = survey(session, &region);
    Ok(ShardsReport {
        region,
        passable: histogram.passable(),
        shards,
    })
}

/// Count and share of one kind.
#[derive(Debug, Serialize)]
pub struct KindShare {
    /// Terrain kind.
    pub kind: TileKind,
    /// Tiles of this kind.
    pub count: u64,
    /// Share of all tiles.
    pub fraction: f64,
}

/// Biome statistics of a region.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Area sampled.
    pub region: Region,
    /// Tiles sampled.
    pub total: u64,
    /// Passable tiles.
    pub passable: u64,
    /// Per-kind counts, zero counts omitted.
    pub kinds: Vec<KindShare>,
    /// Shards found.
    pub shards: usize,
    /// Shards expected from the passable count.
    pub expected_shards: f64,
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}x{} tiles at ({}, {})",
            self.region.width, self.region.height, self.region.x, self.region.y
        )?;
        for share in &self.kinds {
            writeln!(
                f,
                "  {} {:<14} {:>8} {:>6.1}%",
                palette::glyph(share.kind),
                share.kind.name(),
                share.count,
                share.fraction * 100.0
            )?;
        }
        writeln!(f, "  passable: {} of {}", self.passable, self.total)?;
        write!(
            f,
            "  shards:   {} (expected {:.1})",
            self.shards, self.expected_shards
        )
    }
}

/// Builds the `stats` report.
///
/// # Errors
///
/// Invalid region dimensions.
pub fn stats_report(session: &Session, args: &RegionArgs) -> Result<StatsReport> {
    let region = session.region(args)?;
    let (histogram, shards) = survey(session, &region);
    let passable = histogram.passable();
    Ok(StatsReport {
        region,
        total: histogram.total(),
        passable,
        kinds: histogram
            .iter()
            .map(|(kind, count)| KindShare {
                kind,
                count,
                fraction: histogram.fraction(kind),
            })
            .collect(),
        shards: shards.len(),
        expected_shards: expected_shards(passable),
    })
}

// ============================================================================
// WALK
// ============================================================================

/// Outcome of a scripted walk.
#[derive(Debug, Serialize)]
pub struct WalkReport {
    /// Spawn position the walk started from.
    pub start: (f64, f64),
    /// Keys applied.
    pub moves: usize,
    /// Final explorer state.
    pub state: ExplorerState,
    /// Tile under the explorer at the end.
    pub tile: (i64, i64),
    /// Tile cache counters after the walk.
    pub cache: CacheStats,
    /// Map around the final position, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<Vec<String>>,
}

impl fmt::Display for WalkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "walked {} moves from ({}, {}) to ({:.3}, {:.3}), tile ({}, {})\nshards: {}",
            self.moves,
            self.start.0,
            self.start.1,
            self.state.x,
            self.state.y,
            self.tile.0,
            self.tile.1,
            self.state.shards
        )?;
        if let Some(rows) = &self.map {
            for row in rows {
                write!(f, "\n{row}")?;
            }
        }
        Ok(())
    }
}

/// Builds the `walk` report.
///
/// # Errors
///
/// Malformed move scripts and non-positive step lengths.
pub fn walk_report(
    session: &Session,
    script: &str,
    dt: Option<f64>,
    with_map: bool,
) -> Result<WalkReport> {
    let moves = parse_script(script)?;
    let dt = dt.unwrap_or(session.config.explorer.max_dt);
    if !dt.is_finite() || dt <= 0.0 {
        bail!("--dt must be a positive number of seconds, got {dt}");
    }

    let mut explorer = Explorer::spawn(
        &session.cache,
        session.config.explorer,
        session.config.spawn_radius,
    );
    let start = (explorer.state().x, explorer.state().y);
    explorer.run(&moves, dt);
    let state = explorer.into_state();
    let tile = state.tile();

    let map = if with_map {
        let map_size = &session.config.map;
        let region = Region::centered(tile.0, tile.1, map_size.width, map_size.height)?;
        let markers = MapMarkers {
            player: Some(tile),
            collected: Some(&state.collected),
            shards: true,
        };
        Some(render_map(&session.cache, &region, &markers).lines().map(str::to_owned).collect())
    } else {
        None
    };

    Ok(WalkReport {
        start,
        moves: moves.len(),
        tile,
        cache: session.cache.stats(),
        state,
        map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(seed: &str, raw: bool) -> Session {
        Session::new(AppConfig {
            seed: seed.to_owned(),
            raw_seed: raw,
            ..AppConfig::default()
        })
    }

    fn area(cx: i64, cy: i64, width: u32, height: u32) -> RegionArgs {
        RegionArgs {
            cx,
            cy,
            width: Some(width),
            height: Some(height),
        }
    }

    #[test]
    fn test_seed_command() {
        let out = run(&session("adventure", false), &Command::Seed, false).unwrap();
        assert_eq!(out, "adventure:-694094064");
        let out = run(&session("  42 ", false), &Command::Seed, false).unwrap();
        assert_eq!(out, "42");
        let out = run(&session("", false), &Command::Seed, false).unwrap();
        assert_eq!(out, "adventure");
    }

    #[test]
    fn test_tile_command() {
        let report = tile_report(&session("adventure", true), 0, 0);
        assert_eq!(report.kind, TileKind::DeepWater);
        assert_eq!(report.biome, "water");
        assert_eq!(report.color, "#1d4ed8");
        assert!(!report.passable);
        assert!(!report.shard);
        assert_eq!(report.height, 0.2418920536728599);

        let shard = tile_report(&session("adventure", true), 144, 26);
        assert!(shard.shard);
        assert!(shard.passable);
    }

    #[test]
    fn test_tile_json() {
        let out = run(&session("adventure", true), &Command::Tile { x: 0, y: 0 }, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["kind"], "deep_water");
        assert_eq!(value["biome"], "water");
        assert_eq!(value["passable"], false);
    }

    #[test]
    fn test_spawn_command() {
        let report = spawn_report(&session("adventure", true), None);
        assert_eq!((report.x, report.y), (-18.5, 5.5));
        assert_eq!(report.tile, (-19, 5));
        assert!(report.found);
        assert_eq!(report.radius, 300);

        let normalized = spawn_report(&session("adventure", false), None);
        assert_eq!((normalized.x, normalized.y), (1.5, 0.5));

        let fallback = spawn_report(&session("adventure", true), Some(10));
        assert!(!fallback.found);
        assert_eq!((fallback.x, fallback.y), (0.5, 0.5));
        assert!(fallback.to_string().starts_with("no passable tile"));
    }

    #[test]
    fn test_map_marks_spawn() {
        let report = map_report(&session("adventure", true), &area(-19, 5, 9, 5), true).unwrap();
        assert_eq!(report.rows.len(), 5);
        assert_eq!(report.spawn, Some((-19, 5)));
        // Centre of a 9x5 region around (-19, 5)
        assert_eq!(report.rows[2].chars().nth(4), Some('@'));
        assert!(report.to_string().ends_with("@ you"));
    }

    #[test]
    fn test_map_without_spawn_in_view() {
        let report = map_report(&session("adventure", true), &area(500, 500, 8, 4), false).unwrap();
        assert_eq!(report.spawn, None);
        assert!(report.legend.is_none());
        assert!(!report.to_string().contains('@'));
    }

    #[test]
    fn test_shards_and_stats_agree() {
        let s = session("adventure", true);
        let region = area(150, 150, 300, 300);
        let shards = shards_report(&s, &region).unwrap();
        let stats = stats_report(&s, &region).unwrap();

        assert_eq!(shards.region, Region::new(0, 0, 300, 300).unwrap());
        assert_eq!(shards.shards.len(), 17);
        assert_eq!(shards.passable, 57_435);
        assert_eq!(stats.shards, 17);
        assert_eq!(stats.passable, 57_435);
        assert_eq!(stats.total, 90_000);
        assert_eq!(stats.kinds.iter().map(|k| k.count).sum::<u64>(), 90_000);
    }

    #[test]
    fn test_invalid_region_rejected() {
        let err = map_report(&session("adventure", true), &area(0, 0, 0, 5), false).unwrap_err();
        assert!(err.to_string().contains("invalid region"), "{err}");
    }

    #[test]
    fn test_walk_command() {
        let s = session("adventure", true);
        let report = walk_report(&s, &"a".repeat(20), None, true).unwrap();
        assert_eq!(report.start, (-18.5, 5.5));
        assert_eq!(report.moves, 20);
        assert!((report.state.x - -22.7).abs() < 1e-9, "x = {}", report.state.x);
        assert_eq!(report.tile, (-23, 5));
        let rows = report.map.as_ref().unwrap();
        assert_eq!(rows.len(), 32);
        assert!(rows.iter().any(|r| r.contains('@')));
    }

    #[test]
    fn test_walk_picks_up_nothing_at_spawn() {
        let report = walk_report(&session("adventure", true), "e e e", None, false).unwrap();
        assert_eq!(report.moves, 3);
        assert_eq!(report.state.shards, 0);
        assert!(report.map.is_none());
    }

    #[test]
    fn test_walk_rejects_bad_input() {
        let s = session("adventure", true);
        assert!(walk_report(&s, "dq", None, false).is_err());
        assert!(walk_report(&s, "d", Some(0.0), false).is_err());
        assert!(walk_report(&s, "d", Some(f64::NAN), false).is_err());
    }
}
