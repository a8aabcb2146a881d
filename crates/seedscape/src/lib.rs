//! # SEEDSCAPE
//!
//! Headless collaborator around [`seedscape_procedural`]: everything a
//! player-facing client would do with a seeded world, minus the window.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        seedscape (bin)                       │
//! │   cli ──> commands ──> report (text | JSON) ──> stdout       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  config      seedscape.toml -> AppConfig -> World            │
//! │  cache       TileCache (RwLock<HashMap>, region prefetch)    │
//! │  ascii       glyph maps        palette   colours, glyphs     │
//! │  explorer    axis-separated walking, shard pickup            │
//! ├──────────────────────────────────────────────────────────────┤
//! │                   seedscape_procedural (pure)                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The procedural core never touches files; this crate only reads
//! configuration and writes to stdout.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::module_name_repetitions
)]

pub mod ascii;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod explorer;
pub mod palette;

pub use cache::{CacheStats, TileCache};
pub use cli::{Cli, Command, RegionArgs};
pub use commands::{execute, run, Session};
pub use config::{AppConfig, ExplorerConfig, FieldOverrides, MapConfig, TerrainConfig};
pub use error::{ConfigError, ConfigResult, ScriptError};
pub use explorer::{parse_script, Explorer, ExplorerState, Move};
