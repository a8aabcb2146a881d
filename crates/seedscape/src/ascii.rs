//! # Text Maps
//!
//! Renders a region as one glyph per tile, north row first. Shards not yet
//! collected and the explorer are drawn over the terrain.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use seedscape_procedural::Region;

use crate::cache::TileCache;
use crate::palette::{glyph, PLAYER_GLYPH, SHARD_GLYPH};

/// Overlays drawn on top of the terrain.
#[derive(Clone, Debug, Default)]
pub struct MapMarkers<'a> {
    /// Tile to draw the explorer on.
    pub player: Option<(i64, i64)>,
    /// Shards that should no longer be drawn.
    pub collected: Option<&'a BTreeSet<(i64, i64)>>,
    /// Whether to draw shards at all.
    pub shards: bool,
}

/// Renders `region` as text, one line per row with a trailing newline.
#[must_use]
pub fn render_map(cache: &TileCache, region: &Region, markers: &MapMarkers<'_>) -> String {
    let tiles = cache.prefetch(region);
    let width = region.width as usize;
    let mut out = String::with_capacity((width + 1) * region.height as usize);

    for (row, row_tiles) in (0..region.height).zip(tiles.chunks(width)) {
        for ((tx, ty), tile) in region.row(row).zip(row_tiles) {
            let ch = if markers.player == Some((tx, ty)) {
                PLAYER_GLYPH
            } else if markers.shards
                && tile.passable
                && !markers.collected.is_some_and(|c| c.contains(&(tx, ty)))
                && cache.has_shard_at(tx, ty)
            {
                SHARD_GLYPH
            } else {
                glyph(tile.kind)
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

/// One-line legend of the glyphs used by [`render_map`].
#[must_use]
pub fn legend() -> String {
    let mut out = String::new();
    for kind in seedscape_procedural::TileKind::ALL {
        let _ = write!(out, "{} {}  ", glyph(kind), kind.name());
    }
    let _ = write!(out, "{SHARD_GLYPH} shard  {PLAYER_GLYPH} you");
    out
}
