//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Triaconta command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "triaconta", about = "Triacontahedral globe surface demo")]
pub struct CliArgs {
    /// Full-resolution tiles per face side.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Cells per face side.
    #[arg(long)]
    pub cells: Option<u32>,

    /// Maximum mesh builds per frame.
    #[arg(long)]
    pub max_builds: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    pub frames: u32,

    /// Seed for generated terrain.
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(r) = args.resolution {
            self.globe.resolution = r;
        }
        if let Some(c) = args.cells {
            self.globe.cells_per_side = c;
        }
        if let Some(k) = args.max_builds {
            self.lod.max_builds_per_frame = k;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            resolution: Some(32),
            max_builds: Some(2),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.globe.resolution, 32);
        assert_eq!(config.lod.max_builds_per_frame, 2);
        // Non-overridden fields retain defaults
        assert_eq!(config.globe.cells_per_side, 4);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "triaconta",
            "--cells",
            "8",
            "--log-level",
            "debug",
            "--frames",
            "10",
        ]);
        assert_eq!(args.cells, Some(8));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.frames, 10);
        assert_eq!(args.seed, 7);
    }
}
