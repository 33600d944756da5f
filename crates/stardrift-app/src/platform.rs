//! OS directory resolution.
//!
//! Resolves where configuration, logs and snapshots live, following OS
//! conventions (XDG on Linux, Known Folders on Windows, Library on macOS).

use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while resolving or creating directories.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Directories the app reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// `config.ron`.
    pub config_dir: PathBuf,
    /// JSON log files.
    pub log_dir: PathBuf,
    /// PNG snapshots.
    pub snapshot_dir: PathBuf,
}

const APP_NAME: &str = "stardrift";

impl PlatformDirs {
    /// Resolve OS directories without creating them.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let app_config = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);

        let snapshot_dir = dirs::picture_dir()
            .or_else(dirs::data_dir)
            .map(|base| base.join(APP_NAME))
            .unwrap_or_else(|| app_config.join("snapshots"));

        Ok(Self {
            config_dir: app_config.clone(),
            log_dir: app_config.join("logs"),
            snapshot_dir,
        })
    }

    /// Lay out all directories under one root, e.g. a `--config` override or
    /// a test temp dir.
    pub fn with_root(root: &Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            log_dir: root.join("logs"),
            snapshot_dir: root.join("snapshots"),
        }
    }

    /// Create every directory on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] if any directory cannot be created.
    pub fn create_all(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(&self.snapshot_dir)?;
        Ok(())
    }

    /// Resolve a snapshot path: absolute paths pass through, relative ones
    /// land in the snapshot directory.
    pub fn snapshot_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.snapshot_dir.join(path)
        }
    }
}
