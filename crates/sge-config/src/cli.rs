//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments for the DNA simulation.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "dna", about = "Selfish Genes Engine: DNA simulation")]
pub struct CliArgs {
    /// Viewport width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// RNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Scene file to load instead of the built-in demo scene.
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Use nearest-hit raycasts instead of first-registered-hit.
    #[arg(long)]
    pub nearest_hit: bool,

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
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(frames) = args.frames {
            self.simulation.frames = frames;
        }
        if let Some(seed) = args.seed {
            self.simulation.seed = seed;
        }
        if let Some(ref scene) = args.scene {
            self.simulation.scene_path = Some(scene.clone());
        }
        if args.nearest_hit {
            self.physics.nearest_hit_raycast = true;
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
            width: Some(1920),
            frames: Some(30),
            nearest_hit: true,
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.simulation.frames, 30);
        assert!(config.physics.nearest_hit_raycast);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.simulation.seed, Config::default().simulation.seed);
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
        let args = CliArgs::parse_from(["dna", "--frames", "10", "--scene", "a.ron", "--nearest-hit"]);
        assert_eq!(args.frames, Some(10));
        assert_eq!(args.scene, Some(PathBuf::from("a.ron")));
        assert!(args.nearest_hit);
    }
}
