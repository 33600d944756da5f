//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use stardrift_field::{DisplayMode, StreakHeading};

use crate::Config;

/// Display mode as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for DisplayMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => DisplayMode::Light,
            ThemeArg::Dark => DisplayMode::Dark,
            ThemeArg::System => DisplayMode::System,
        }
    }
}

/// Comet heading as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HeadingArg {
    FarCorner,
    FixedAtSpawn,
}

impl From<HeadingArg> for StreakHeading {
    fn from(arg: HeadingArg) -> Self {
        match arg {
            HeadingArg::FarCorner => StreakHeading::TowardFarCorner,
            HeadingArg::FixedAtSpawn => StreakHeading::FixedAtSpawn,
        }
    }
}

/// Stardrift command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "stardrift", about = "Animated star field background")]
pub struct CliArgs {
    /// Viewport width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of frames to present.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Random seed for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Display mode at startup.
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Comet heading.
    #[arg(long, value_enum)]
    pub heading: Option<HeadingArg>,

    /// Pace frames in real time.
    #[arg(long)]
    pub realtime: Option<bool>,

    /// PNG snapshot path.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

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
            self.viewport.width = w;
        }
        if let Some(h) = args.height {
            self.viewport.height = h;
        }
        if let Some(frames) = args.frames {
            self.host.frames = frames;
        }
        if let Some(seed) = args.seed {
            self.field.seed = Some(seed);
        }
        if let Some(theme) = args.theme {
            self.theme.mode = theme.into();
        }
        if let Some(heading) = args.heading {
            self.field.heading = heading.into();
        }
        if let Some(realtime) = args.realtime {
            self.host.realtime = realtime;
        }
        if let Some(ref path) = args.snapshot {
            self.host.snapshot = Some(path.clone());
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
            width: Some(1200),
            seed: Some(42),
            theme: Some(ThemeArg::Light),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.viewport.width, 1200);
        assert_eq!(config.field.seed, Some(42));
        assert_eq!(config.theme.mode, DisplayMode::Light);
        // Non-overridden fields retain defaults
        assert_eq!(config.viewport.height, 720);
        assert_eq!(config.host.frames, 600);
    }

    #[test]
    fn test_cli_no_override() {
        let defaults = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, defaults);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "stardrift",
            "--width",
            "1200",
            "--height",
            "800",
            "--theme",
            "dark",
            "--heading",
            "fixed-at-spawn",
            "--snapshot",
            "out.png",
        ])
        .unwrap();
        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert_eq!(config.viewport.size(), stardrift_field::SurfaceSize::new(1200, 800));
        assert_eq!(config.field.heading, StreakHeading::FixedAtSpawn);
        assert_eq!(config.host.snapshot, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        assert!(CliArgs::try_parse_from(["stardrift", "--theme", "sepia"]).is_err());
    }
}
