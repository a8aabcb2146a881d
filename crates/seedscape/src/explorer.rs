//! # Explorer
//!
//! A walker on the tile grid: continuous position, fixed speed, and shard
//! pickup.
//!
//! Movement is resolved one axis at a time. The horizontal move is tested
//! against the current row, the vertical move against the already-updated
//! column, so the explorer slides along coastlines instead of sticking to
//! them. A blocked axis simply does not move; there is no push-out.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::TileCache;
use crate::config::ExplorerConfig;
use crate::error::ScriptError;

/// One scripted input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// `w`: toward negative y.
    Up,
    /// `s`: toward positive y.
    Down,
    /// `a`: toward negative x.
    Left,
    /// `d`: toward positive x.
    Right,
    /// `e`: pick up a shard on the current tile.
    Interact,
}

impl Move {
    /// Parses a single key, case-insensitively.
    #[must_use]
    pub fn from_key(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'w' => Some(Self::Up),
            's' => Some(Self::Down),
            'a' => Some(Self::Left),
            'd' => Some(Self::Right),
            'e' => Some(Self::Interact),
            _ => None,
        }
    }

    /// Unit direction of a movement key; `(0, 0)` for [`Move::Interact`].
    #[must_use]
    pub const fn direction(self) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Interact => (0.0, 0.0),
        }
    }
}

/// Parses a move script such as `"dddd e ww"`. Whitespace is ignored.
///
/// # Errors
///
/// [`ScriptError::UnknownMove`] for any other character.
pub fn parse_script(script: &str) -> Result<Vec<Move>, ScriptError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, ch)| !ch.is_whitespace())
        .map(|(index, ch)| Move::from_key(ch).ok_or(ScriptError::UnknownMove { ch, index }))
        .collect()
}

/// Explorer progress: position and collected shards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorerState {
    /// Continuous x position in tiles.
    pub x: f64,
    /// Continuous y position in tiles.
    pub y: f64,
    /// Shards picked up so far.
    pub shards: u32,
    /// Tiles whose shard has been picked up.
    pub collected: BTreeSet<(i64, i64)>,
}

impl ExplorerState {
    /// Tile under the explorer.
    #[must_use]
    pub fn tile(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

/// Walker bound to a world through a [`TileCache`].
pub struct Explorer<'a> {
    cache: &'a TileCache,
    config: ExplorerConfig,
    state: ExplorerState,
}

impl<'a> Explorer<'a> {
    /// Places an explorer at a position. The position is not checked.
    #[must_use]
    pub fn at(cache: &'a TileCache, config: ExplorerConfig, x: f64, y: f64) -> Self {
        Self {
            cache,
            config,
            state: ExplorerState {
                x,
                y,
                ..ExplorerState::default()
            },
        }
    }

    /// Places an explorer on the world's spawn point.
    #[must_use]
    pub fn spawn(cache: &'a TileCache, config: ExplorerConfig, radius: u32) -> Self {
        let spawn = cache.world().spiral_find_passable(0, 0, radius);
        info!(x = spawn.x, y = spawn.y, found = spawn.found, "explorer spawned");
        Self::at(cache, config, spawn.x, spawn.y)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ExplorerState {
        &self.state
    }

    /// Consumes the explorer, returning its state.
    #[must_use]
    pub fn into_state(self) -> ExplorerState {
        self.state
    }

    /// Moves along `(dx, dy)` for `dt` seconds.
    ///
    /// The direction is normalized and `dt` is capped at `config.max_dt`;
    /// a non-positive or NaN `dt` does nothing. Each axis is blocked
    /// independently by impassable tiles. Returns whether the position
    /// changed.
    pub fn step(&mut self, dx: f64, dy: f64, dt: f64) -> bool {
        if (dx == 0.0 && dy == 0.0) || dt.is_nan() || dt <= 0.0 {
            return false;
        }
        let dt = dt.min(self.config.max_dt);
        let inv = 1.0 / dx.hypot(dy);
        let (vx, vy) = (dx * inv, dy * inv);
        let speed = self.config.speed;

        let nx = self.state.x + vx * speed * dt;
        let ny = self.state.y + vy * speed * dt;
        let before = (self.state.x, self.state.y);

        if self.cache.is_passable_at(nx, self.state.y) {
            self.state.x = nx;
        }
        if self.cache.is_passable_at(self.state.x, ny) {
            self.state.y = ny;
        }
        before != (self.state.x, self.state.y)
    }

    /// Picks up the shard on the current tile, if any and not already taken.
    pub fn interact(&mut self) -> bool {
        let (tx, ty) = self.state.tile();
        if !self.cache.has_shard_at(tx, ty) || !self.state.collected.insert((tx, ty)) {
            return false;
        }
        self.state.shards += 1;
        info!(tx, ty, total = self.state.shards, "shard collected");
        true
    }

    /// Applies one scripted input.
    pub fn apply(&mut self, mv: Move, dt: f64) {
        if mv == Move::Interact {
            self.interact();
        } else {
            let (dx, dy) = mv.direction();
            self.step(dx, dy, dt);
        }
    }

    /// Applies a whole script, one `dt` step per movement key.
    pub fn run(&mut self, moves: &[Move], dt: f64) {
        for &mv in moves {
            self.apply(mv, dt);
        }
        debug!(
            moves = moves.len(),
            x = self.state.x,
            y = self.state.y,
            shards = self.state.shards,
            "script finished"
        );
    }
}
