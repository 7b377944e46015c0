//! Command-line argument parsing shared by voxpost binaries.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// World configuration overrides.
///
/// CLI values override settings loaded from `config.ron`. Binaries flatten
/// this into their own parser.
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Terrain preset (greenery, desert, mountains).
    #[arg(long)]
    pub preset: Option<String>,

    /// Horizontal chunk size in cells (even).
    #[arg(long)]
    pub chunk_size: Option<u32>,

    /// Streaming radius in chunks.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Generation worker threads (0 = auto).
    #[arg(long)]
    pub workers: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(ref preset) = args.preset {
            self.world.preset = preset.clone();
        }
        if let Some(size) = args.chunk_size {
            self.world.chunk_size = size;
        }
        if let Some(radius) = args.radius {
            self.streaming.radius = radius;
        }
        if let Some(workers) = args.workers {
            self.streaming.worker_threads = workers;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CliArgs,
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(42),
            preset: Some("desert".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.preset, "desert");
        // Non-overridden fields retain defaults
        assert_eq!(config.world.chunk_size, 64);
        assert_eq!(config.streaming.radius, 1);
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
        let cli = TestCli::try_parse_from([
            "voxpost",
            "--seed",
            "7",
            "--radius",
            "2",
            "--workers",
            "4",
            "--chunk-size",
            "32",
        ])
        .unwrap();
        assert_eq!(cli.args.seed, Some(7));
        assert_eq!(cli.args.radius, Some(2));
        assert_eq!(cli.args.workers, Some(4));
        assert_eq!(cli.args.chunk_size, Some(32));
        assert_eq!(cli.args.preset, None);
    }
}
