//! Ambient star points: a slowly falling, twinkling dot field.

use glam::Vec2;

use crate::random::RandomSource;
use crate::surface::{DrawContext, Rgba, SurfaceSize};

/// Lowest opacity a star can twinkle down to.
pub const MIN_STAR_OPACITY: f32 = 0.2;
/// Highest opacity a star can twinkle up to.
pub const MAX_STAR_OPACITY: f32 = 1.0;
/// Largest per-frame opacity change in either direction.
pub const TWINKLE_STEP: f32 = 0.005;

/// A single ambient star.
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    /// Position in surface pixels. `y` is always in `[0, height)`.
    pub position: Vec2,
    /// Circle radius in pixels, in `[0, 2)`.
    pub radius: f32,
    /// Fill alpha in `[MIN_STAR_OPACITY, MAX_STAR_OPACITY]`.
    pub opacity: f32,
    /// Downward drift in pixels per frame.
    pub fall_speed: f32,
}

impl Star {
    /// Place a star uniformly on the surface.
    pub fn spawn(size: SurfaceSize, rng: &mut impl RandomSource) -> Self {
        let x = rng.below(size.width_f32());
        let y = rng.below(size.height_f32());
        Self {
            position: Vec2::new(x, y),
            radius: rng.unit() * 2.0,
            opacity: rng.unit() * 0.8 + 0.2,
            fall_speed: rng.unit() * 0.05 + 0.01,
        }
    }

    pub fn draw(&self, ctx: &mut impl DrawContext) {
        ctx.fill_circle(self.position, self.radius, Rgba::white(self.opacity));
    }

    /// Twinkle, fall, and wrap to the top edge with a fresh `x` once the
    /// bottom edge is reached.
    pub fn advance(&mut self, size: SurfaceSize, rng: &mut impl RandomSource) {
        let delta = (rng.unit() - 0.5) * (TWINKLE_STEP * 2.0);
        self.opacity = (self.opacity + delta).clamp(MIN_STAR_OPACITY, MAX_STAR_OPACITY);

        self.position.y += self.fall_speed;
        if self.position.y >= size.height_f32() {
            self.position.y = 0.0;
            self.position.x = rng.below(size.width_f32());
        }
    }
}

/// Number of stars for a surface: one per `pixels_per_star` pixels of area.
pub fn star_count(size: SurfaceSize, pixels_per_star: u32) -> usize {
    (size.area() / pixels_per_star.max(1) as u64) as usize
}

/// Generate a full star set for the given surface.
pub fn populate(
    size: SurfaceSize,
    pixels_per_star: u32,
    rng: &mut impl RandomSource,
) -> Vec<Star> {
    let count = star_count(size, pixels_per_star);
    let mut stars = Vec::with_capacity(count);
    for _ in 0..count {
        stars.push(Star::spawn(size, rng));
    }
    stars
}
