//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stardrift_field::{DisplayMode, FieldParams, StreakHeading, SurfaceSize};

use crate::error::ConfigError;

/// File name of the persisted configuration.
pub const CONFIG_FILE: &str = "config.ron";

/// Largest viewport side the host will allocate a canvas for.
pub const MAX_VIEWPORT_SIDE: u32 = 16384;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Viewport geometry.
    pub viewport: ViewportConfig,
    /// Star and comet tunables.
    pub field: FieldConfig,
    /// Display mode settings.
    pub theme: ThemeConfig,
    /// Frame presentation and output.
    pub host: HostConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Viewport configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
}

/// Particle field configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Fixed random seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Surface area (in pixels) per star.
    pub pixels_per_star: u32,
    /// Maximum comets alive at once.
    pub max_active_streaks: usize,
    /// Per-frame probability of attempting a comet spawn.
    pub streak_spawn_chance: f32,
    /// How comets aim.
    pub heading: StreakHeading,
}

/// Display mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    /// Mode at startup.
    pub mode: DisplayMode,
    /// Flip between dark and light every this many frames (0 = never).
    pub cycle_frames: u32,
}

/// Host loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    /// Display refresh rate in Hz.
    pub refresh_hz: u32,
    /// Frames to present before exiting.
    pub frames: u32,
    /// Pace frames against the wall clock instead of running flat out.
    pub realtime: bool,
    /// Where to write the final PNG snapshot. Relative paths resolve against
    /// the snapshot directory.
    pub snapshot: Option<PathBuf>,
    /// Page background the layer is composited over, as RGB.
    pub background: [u8; 3],
    /// Resize the viewport once, mid-run.
    pub resize: Option<ResizeStep>,
}

/// A scheduled viewport resize.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResizeStep {
    /// Presented frame count at which the resize lands.
    pub at_frame: u32,
    pub width: u32,
    pub height: u32,
}

impl ResizeStep {
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        let params = FieldParams::default();
        Self {
            seed: None,
            pixels_per_star: params.pixels_per_star,
            max_active_streaks: params.max_active_streaks,
            streak_spawn_chance: params.streak_spawn_chance,
            heading: params.heading,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Dark,
            cycle_frames: 0,
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            refresh_hz: 60,
            frames: 600,
            realtime: false,
            snapshot: Some(PathBuf::from("stardrift.png")),
            background: [9, 9, 20],
            resize: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

impl FieldConfig {
    /// Renderer parameters for this config.
    pub fn params(&self) -> FieldParams {
        FieldParams {
            pixels_per_star: self.pixels_per_star,
            max_active_streaks: self.max_active_streaks,
            streak_spawn_chance: self.streak_spawn_chance,
            heading: self.heading,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject settings the host cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_side("viewport.width", self.viewport.width)?;
        check_side("viewport.height", self.viewport.height)?;
        if let Some(step) = &self.host.resize {
            check_side("host.resize.width", step.width)?;
            check_side("host.resize.height", step.height)?;
        }
        if self.host.refresh_hz == 0 {
            return Err(ConfigError::InvalidValue {
                key: "host.refresh_hz",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.field.pixels_per_star == 0 {
            return Err(ConfigError::InvalidValue {
                key: "field.pixels_per_star",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.field.streak_spawn_chance) {
            return Err(ConfigError::InvalidValue {
                key: "field.streak_spawn_chance",
                reason: format!("{} is not a probability", self.field.streak_spawn_chance),
            });
        }
        Ok(())
    }
}

fn check_side(key: &'static str, side: u32) -> Result<(), ConfigError> {
    if side > MAX_VIEWPORT_SIDE {
        return Err(ConfigError::InvalidValue {
            key,
            reason: format!("{side} exceeds {MAX_VIEWPORT_SIDE} pixels"),
        });
    }
    Ok(())
}
