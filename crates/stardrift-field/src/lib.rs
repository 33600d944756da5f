//! Animated star field background: a full-viewport layer of slowly falling,
//! twinkling stars and occasional comets, drawn only while the display mode is
//! dark.
//!
//! A host mounts a [`ParticleField`] on a drawing surface, hands it a
//! [`Viewport`], a [`ThemeSignal`] and a [`FrameScheduler`], then delivers each
//! presented [`FrameTick`] to [`ParticleField::on_frame`].

pub mod comet;
pub mod field;
pub mod random;
pub mod scheduler;
pub mod star;
pub mod surface;
pub mod theme;
pub mod viewport;

pub use comet::{Comet, Edge, StreakHeading};
pub use field::{FieldHost, FieldParams, FrameOutcome, ParticleField};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use scheduler::{ClockScheduler, FrameClock, FrameRequest, FrameScheduler, FrameTick};
pub use star::{Star, star_count};
pub use surface::{DrawCommand, DrawContext, RecordingContext, Rgba, SurfaceHandle, SurfaceSize};
pub use theme::{DisplayMode, LayerFade, ThemeSignal};
pub use viewport::{ResizeSubscription, Viewport};
