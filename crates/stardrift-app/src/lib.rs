//! Stardrift host application.
//!
//! Provides directory resolution, refresh pacing, a software drawing surface,
//! and the headless run loop driving a particle field.

pub mod host;
pub mod platform;
pub mod present_loop;
pub mod raster;

pub use host::{AppError, RunSummary, run};
