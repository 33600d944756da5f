//! Headless host: mounts a particle field on a raster canvas, presents frames
//! at the configured refresh rate and writes a PNG snapshot of the result.

use std::path::PathBuf;
use std::time::Duration;

use stardrift_config::{Config, ConfigError, ResizeStep};
use stardrift_field::{
    ClockScheduler, DisplayMode, DrawContext, FieldHost, FrameClock, FrameOutcome,
    ParticleField, SeededRandom, ThemeSignal, Viewport,
};
use tracing::{debug, info, instrument, warn};

use crate::platform::{PlatformDirs, PlatformError};
use crate::present_loop::PresentLoop;
use crate::raster::RasterCanvas;

/// Errors surfaced by the host binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to write snapshot: {0}")]
    Snapshot(#[from] image::ImageError),
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub drawn: u64,
    pub idle: u64,
    pub stars: usize,
    pub comets: usize,
    pub snapshot: Option<PathBuf>,
}

type HostedField = ParticleField<RasterCanvas, ClockScheduler, SeededRandom>;

/// Per-run state shared by the present callback.
struct Session {
    field: HostedField,
    clock: FrameClock,
    theme: ThemeSignal,
    viewport: Viewport,
    cycle_frames: u32,
    resize: Option<ResizeStep>,
    summary: RunSummary,
    last_timestamp: Duration,
}

impl Session {
    fn present(&mut self, timestamp: Duration) {
        self.last_timestamp = timestamp;
        if self.cycle_frames > 0
            && self.summary.frames > 0
            && self.summary.frames % self.cycle_frames as u64 == 0
        {
            let next = if self.theme.get().is_dark() {
                DisplayMode::Light
            } else {
                DisplayMode::Dark
            };
            debug!(frame = self.summary.frames, ?next, "cycling display mode");
            self.theme.set(next);
        }
        if let Some(step) = self.resize
            && self.summary.frames == step.at_frame as u64
        {
            debug!(
                frame = self.summary.frames,
                width = step.width,
                height = step.height,
                "resizing viewport"
            );
            self.viewport.resize(step.size());
            self.resize = None;
        }

        let Some(tick) = self.clock.present(timestamp) else {
            return;
        };
        match self.field.on_frame(tick) {
            FrameOutcome::Drawn => self.summary.drawn += 1,
            FrameOutcome::Idle => self.summary.idle += 1,
            FrameOutcome::Stale => return,
        }
        self.summary.frames += 1;
    }
}

/// Seed from config, or from entropy when unset.
fn random_source(config: &Config) -> SeededRandom {
    match config.field.seed {
        Some(seed) => SeededRandom::new(seed),
        None => SeededRandom::from_entropy(),
    }
}

/// Run the configured number of frames and write the snapshot, if any.
#[instrument(skip_all, fields(width = config.viewport.width, height = config.viewport.height))]
pub fn run(config: &Config, dirs: &PlatformDirs) -> Result<RunSummary, AppError> {
    config.validate()?;

    let viewport = Viewport::new(config.viewport.size());
    let theme = ThemeSignal::new(config.theme.mode);
    let clock = FrameClock::new();
    let host = FieldHost {
        viewport: viewport.clone(),
        theme: theme.clone(),
        scheduler: clock.scheduler(),
    };

    let Some(field) = ParticleField::mount(
        Some(RasterCanvas::new()),
        host,
        random_source(config),
        config.field.params(),
    ) else {
        warn!("no drawing surface, nothing to render");
        return Ok(RunSummary::default());
    };

    let mut session = Session {
        field,
        clock,
        theme,
        viewport,
        cycle_frames: config.theme.cycle_frames,
        resize: config.host.resize,
        summary: RunSummary::default(),
        last_timestamp: Duration::ZERO,
    };

    let target = config.host.frames as u64;
    let mut present_loop = PresentLoop::new(config.host.refresh_hz);
    info!(
        frames = target,
        refresh_hz = config.host.refresh_hz,
        realtime = config.host.realtime,
        "presenting"
    );

    while session.summary.frames < target {
        if config.host.realtime {
            std::thread::sleep(present_loop.until_next());
            present_loop.tick(|t| {
                if session.summary.frames < target {
                    session.present(t);
                }
            });
        } else {
            present_loop.step(|t| session.present(t));
        }
    }

    session.summary.stars = session.field.stars().len();
    session.summary.comets = session.field.comets().len();

    if let Some(path) = &config.host.snapshot {
        let canvas = session.field.context();
        if canvas.size().area() == 0 {
            warn!("surface is empty, skipping snapshot");
        } else {
            let path = dirs.snapshot_path(path);
            let opacity = session.field.layer_opacity(session.last_timestamp);
            canvas.save_png(&path, config.host.background, opacity)?;
            info!(path = %path.display(), opacity, "snapshot written");
            session.summary.snapshot = Some(path);
        }
    }

    let Session { field, summary, .. } = session;
    field.dispose();
    info!(
        frames = summary.frames,
        drawn = summary.drawn,
        idle = summary.idle,
        "done"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stardrift_field::SurfaceSize;

    fn test_config(frames: u32) -> Config {
        let mut config = Config::default();
        config.viewport.width = 240;
        config.viewport.height = 160;
        config.field.seed = Some(42);
        config.host.frames = frames;
        config.host.snapshot = None;
        config
    }

    #[test]
    fn test_run_draws_every_frame_in_dark_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_root(tmp.path());
        let summary = run(&test_config(30), &dirs).unwrap();
        assert_eq!(summary.frames, 30);
        assert_eq!(summary.drawn, 30);
        assert_eq!(summary.idle, 0);
        assert_eq!(
            summary.stars,
            stardrift_field::star_count(SurfaceSize::new(240, 160), 3000)
        );
        assert!(summary.comets <= 3);
    }

    #[test]
    fn test_run_idles_in_light_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_root(tmp.path());
        let mut config = test_config(20);
        config.theme.mode = DisplayMode::Light;
        let summary = run(&config, &dirs).unwrap();
        assert_eq!(summary.frames, 20);
        assert_eq!(summary.drawn, 0);
        assert_eq!(summary.idle, 20);
    }

    #[test]
    fn test_theme_cycle_alternates() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_root(tmp.path());
        let mut config = test_config(40);
        config.theme.cycle_frames = 10;
        let summary = run(&config, &dirs).unwrap();
        assert_eq!(summary.drawn, 20);
        assert_eq!(summary.idle, 20);
    }

    #[test]
    fn test_run_writes_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_root(tmp.path());
        let mut config = test_config(5);
        config.host.snapshot = Some(PathBuf::from("field.png"));
        let summary = run(&config, &dirs).unwrap();
        let path = summary.snapshot.unwrap();
        assert_eq!(path, tmp.path().join("snapshots").join("field.png"));
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (240, 160));
    }

    #[test]
    fn test_mid_run_resize_reaches_field_and_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_root(tmp.path());
        let mut config = test_config(10);
        config.host.snapshot = Some(PathBuf::from("resized.png"));
        config.host.resize = Some(ResizeStep {
            at_frame: 4,
            width: 600,
            height: 300,
        });
        let summary = run(&config, &dirs).unwrap();
        assert_eq!(summary.frames, 10);
        assert_eq!(summary.drawn, 10);
        assert_eq!(summary.stars, 600 * 300 / 3000);
        let image = image::open(summary.snapshot.unwrap()).unwrap();
        assert_eq!((image.width(), image.height()), (600, 300));
    }

    #[test]
    fn test_oversized_viewport_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_root(tmp.path());
        let mut config = test_config(5);
        config.viewport.width = u32::MAX;
        config.viewport.height = u32::MAX;
        assert!(matches!(run(&config, &dirs), Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_root(tmp.path());
        let mut config = test_config(5);
        config.host.refresh_hz = 0;
        assert!(matches!(run(&config, &dirs), Err(AppError::Config(_))));
    }
}
