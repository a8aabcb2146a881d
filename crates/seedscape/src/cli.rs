//! # Command Line
//!
//! `clap` derive definitions for the `seedscape` binary. Command-line values
//! override the configuration file, which overrides built-in defaults.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Query, map and explore seeded tile worlds.
#[derive(Parser, Debug)]
#[command(name = "seedscape", version)]
#[command(about = "Query, map and explore seeded tile worlds")]
pub struct Cli {
    /// Seed text, normalized the way a player would type it
    #[arg(long, global = true)]
    pub seed: Option<String>,

    /// Use the seed text verbatim as the world key
    #[arg(long, global = true)]
    pub raw_seed: bool,

    /// Configuration file (defaults to ./seedscape.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the world key the seed normalizes to
    Seed,

    /// Describe one tile
    Tile {
        /// Tile column
        #[arg(allow_negative_numbers = true)]
        x: i64,
        /// Tile row
        #[arg(allow_negative_numbers = true)]
        y: i64,
    },

    /// Find the spawn point
    Spawn {
        /// Spiral search radius (defaults to the configured spawn radius)
        #[arg(long)]
        radius: Option<u32>,
    },

    /// Draw a text map
    Map {
        /// Area to draw
        #[command(flatten)]
        region: RegionArgs,

        /// Append a glyph legend
        #[arg(long)]
        legend: bool,
    },

    /// List shard tiles in a region
    Shards {
        /// Area to search
        #[command(flatten)]
        region: RegionArgs,
    },

    /// Biome histogram and shard density of a region
    Stats {
        /// Area to survey
        #[command(flatten)]
        region: RegionArgs,
    },

    /// Walk from the spawn point following a move script (w a s d, e to pick up)
    Walk {
        /// Move script, one step per key
        moves: String,

        /// Seconds per step (clamped to the configured maximum)
        #[arg(long)]
        dt: Option<f64>,

        /// Draw a map around the final position
        #[arg(long)]
        map: bool,
    },
}

/// Region selection shared by the area commands.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionArgs {
    /// Centre column
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub cx: i64,

    /// Centre row
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub cy: i64,

    /// Width in tiles (defaults to the configured map width)
    #[arg(long)]
    pub width: Option<u32>,

    /// Height in tiles (defaults to the configured map height)
    #[arg(long)]
    pub height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("seedscape").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_coordinates() {
        let cli = parse(&["tile", "-250", "-3"]);
        assert_eq!(cli.command, Command::Tile { x: -250, y: -3 });

        let cli = parse(&["map", "--cx", "-40", "--cy=-2", "--width", "10"]);
        let Command::Map { region, legend } = cli.command else {
            panic!("expected map");
        };
        assert_eq!(region.cx, -40);
        assert_eq!(region.cy, -2);
        assert_eq!(region.width, Some(10));
        assert_eq!(region.height, None);
        assert!(!legend);
    }

    #[test]
    fn test_area_commands_share_region_args() {
        let expected = RegionArgs {
            cx: i64::MIN,
            cy: 7,
            width: Some(8),
            height: None,
        };
        let tail = ["--cx", "-9223372036854775808", "--cy", "7", "--width", "8"];
        for name in ["map", "shards", "stats"] {
            let args: Vec<&str> = std::iter::once(name).chain(tail).collect();
            let region = match parse(&args).command {
                Command::Map { region, .. }
                | Command::Shards { region }
                | Command::Stats { region } => region,
                other => panic!("unexpected {other:?}"),
            };
            assert_eq!(region, expected, "{name}");
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["spawn", "--seed", "hello", "--json", "-vv"]);
        assert_eq!(cli.seed.as_deref(), Some("hello"));
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command, Command::Spawn { radius: None });
    }

    #[test]
    fn test_walk_args() {
        let cli = parse(&["walk", "ddd e", "--dt", "0.02", "--raw-seed"]);
        assert!(cli.raw_seed);
        assert_eq!(
            cli.command,
            Command::Walk {
                moves: "ddd e".to_owned(),
                dt: Some(0.02),
                map: false,
            }
        );
    }

    #[test]
    fn test_missing_subcommand_rejected() {
        assert!(Cli::try_parse_from(["seedscape"]).is_err());
    }
}
