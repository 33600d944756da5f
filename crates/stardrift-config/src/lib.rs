//! Configuration for Stardrift.
//!
//! Settings persist to disk as RON with `#[serde(default)]` sections, so older
//! or partial files still load. CLI flags override file values.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, HeadingArg, ThemeArg};
pub use config::{
    CONFIG_FILE, Config, DebugConfig, FieldConfig, HostConfig, MAX_VIEWPORT_SIDE, ResizeStep,
    ThemeConfig, ViewportConfig,
};
pub use error::ConfigError;
