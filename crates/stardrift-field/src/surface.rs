//! Drawing surface abstraction.
//!
//! The field draws through [`DrawContext`], a minimal 2D immediate-mode API
//! (clear, filled circle, fading line). Hosts supply a [`SurfaceHandle`] that
//! may or may not yield a context; a handle without one leaves the field
//! unmounted.

use glam::Vec2;

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }

    /// Far (bottom-right) corner in surface coordinates.
    pub fn far_corner(&self) -> Vec2 {
        Vec2::new(self.width_f32(), self.height_f32())
    }
}

/// Straight-alpha color. Channels are 8-bit, alpha is in `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// White at the given alpha.
    pub const fn white(a: f32) -> Self {
        Self::new(255, 255, 255, a)
    }
}

/// Immediate-mode 2D drawing target.
pub trait DrawContext {
    /// Resize the backing store. Contents are discarded.
    fn resize(&mut self, size: SurfaceSize);

    /// Current backing store size.
    fn size(&self) -> SurfaceSize;

    /// Clear the whole surface to transparent.
    fn clear(&mut self);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a straight line whose alpha fades linearly from `color.a` at
    /// `from` to zero at `to`.
    fn stroke_fading_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// Something that can provide a drawing context, e.g. a canvas element that
/// may not be attached yet.
pub trait SurfaceHandle {
    type Context: DrawContext;

    /// Acquire the drawing context, or `None` if the surface is unavailable.
    fn acquire(self) -> Option<Self::Context>;
}

impl<C: DrawContext> SurfaceHandle for Option<C> {
    type Context = C;

    fn acquire(self) -> Option<C> {
        self
    }
}

/// A single recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Resize(SurfaceSize),
    Clear,
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    StrokeFadingLine {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

/// A context that draws nothing and records every call.
#[derive(Clone, Debug, Default)]
pub struct RecordingContext {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded calls.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of filled circles recorded.
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count()
    }

    /// Number of fading lines recorded.
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeFadingLine { .. }))
            .count()
    }
}

impl DrawContext for RecordingContext {
    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.commands.push(DrawCommand::Resize(size));
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_fading_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokeFadingLine {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_does_not_overflow() {
        let size = SurfaceSize::new(u32::MAX, 2);
        assert_eq!(size.area(), u32::MAX as u64 * 2);
    }

    #[test]
    fn test_far_corner() {
        assert_eq!(
            SurfaceSize::new(1200, 800).far_corner(),
            Vec2::new(1200.0, 800.0)
        );
    }

    #[test]
    fn test_missing_handle_yields_no_context() {
        let handle: Option<RecordingContext> = None;
        assert!(handle.acquire().is_none());
    }

    #[test]
    fn test_recording_context_tracks_calls() {
        let mut ctx = RecordingContext::new();
        ctx.resize(SurfaceSize::new(10, 10));
        ctx.clear();
        ctx.fill_circle(Vec2::ZERO, 1.0, Rgba::white(0.5));
        ctx.stroke_fading_line(Vec2::ZERO, Vec2::ONE, 2.0, Rgba::white(1.0));
        assert_eq!(ctx.size(), SurfaceSize::new(10, 10));
        assert_eq!(ctx.commands().len(), 4);
        assert_eq!(ctx.circle_count(), 1);
        assert_eq!(ctx.line_count(), 1);
        assert_eq!(ctx.take_commands().len(), 4);
        assert!(ctx.commands().is_empty());
    }
}
