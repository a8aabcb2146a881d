//! # Tile Palette
//!
//! Display colours and map glyphs for each tile kind.

use seedscape_procedural::TileKind;

/// Colour used for shard markers.
pub const SHARD_COLOR: &str = "#f472b6";

/// Colour used for the explorer.
pub const PLAYER_COLOR: &str = "#fbbf24";

/// Glyph used for uncollected shards on a text map.
pub const SHARD_GLYPH: char = '$';

/// Glyph used for the explorer or spawn point on a text map.
pub const PLAYER_GLYPH: char = '@';

/// Hex colour of a tile kind.
#[must_use]
pub const fn color(kind: TileKind) -> &'static str {
    match kind {
        TileKind::DeepWater => "#1d4ed8",
        TileKind::ShallowWater => "#3b82f6",
        TileKind::Sand => "#d9c690",
        TileKind::Grass => "#6cab64",
        TileKind::Forest => "#2f7d3d",
        TileKind::Rock => "#8e9aa6",
        TileKind::Snow => "#e5eef7",
    }
}

/// Single-character glyph of a tile kind.
#[must_use]
pub const fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::DeepWater => '~',
        TileKind::ShallowWater => '-',
        TileKind::Sand => '.',
        TileKind::Grass => ',',
        TileKind::Forest => 'T',
        TileKind::Rock => '^',
        TileKind::Snow => '*',
    }
}
