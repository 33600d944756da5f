//! Comets: short-lived streaks that enter from a surface edge and trail a
//! fading tail.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::surface::{DrawContext, Rgba, SurfaceSize};

/// Radius of the comet head in pixels.
pub const HEAD_RADIUS: f32 = 2.0;
/// Stroke width of the comet tail in pixels.
pub const TAIL_WIDTH: f32 = 2.0;

/// Surface edge a comet enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Pick an edge uniformly.
    pub fn pick(rng: &mut impl RandomSource) -> Self {
        let index = (rng.unit() * 4.0) as usize;
        Self::ALL[index.min(3)]
    }

    /// A uniformly random point on this edge.
    pub fn entry_point(self, size: SurfaceSize, rng: &mut impl RandomSource) -> Vec2 {
        let (w, h) = (size.width_f32(), size.height_f32());
        match self {
            Edge::Top => Vec2::new(rng.below(w), 0.0),
            Edge::Right => Vec2::new(w, rng.below(h)),
            Edge::Bottom => Vec2::new(rng.below(w), h),
            Edge::Left => Vec2::new(0.0, rng.below(h)),
        }
    }
}

/// How a comet picks its direction of travel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakHeading {
    /// Re-aim at the far (bottom-right) corner every frame. Comets that reach
    /// the corner hover around it instead of leaving.
    #[default]
    TowardFarCorner,
    /// Aim at the far corner once at spawn and keep that direction.
    FixedAtSpawn,
}

/// A single comet.
#[derive(Clone, Debug, PartialEq)]
pub struct Comet {
    /// Head position in surface pixels.
    pub position: Vec2,
    /// Nominal streak length in pixels.
    pub length: f32,
    /// Tail length multiplier; also pads the bounds used for removal.
    pub tail_length: f32,
    /// Distance travelled per frame.
    pub speed: f32,
    /// Head alpha; the tail fades from here to zero.
    pub opacity: f32,
    pub active: bool,
    /// Edge the comet entered from.
    pub edge: Edge,
    /// Per-frame displacement frozen at spawn, for [`StreakHeading::FixedAtSpawn`].
    fixed_velocity: Option<Vec2>,
}

impl Comet {
    /// Spawn a comet on a random edge.
    pub fn spawn(size: SurfaceSize, heading: StreakHeading, rng: &mut impl RandomSource) -> Self {
        let edge = Edge::pick(rng);
        let position = edge.entry_point(size, rng);
        let length = rng.unit() * 100.0 + 50.0;
        let speed = rng.unit() * 5.0 + 3.0;
        let opacity = rng.unit() * 0.5 + 0.5;
        let tail_length = rng.unit() * 100.0 + 50.0;

        let mut comet = Self::new(edge, position, speed, opacity, tail_length);
        comet.length = length;
        if heading == StreakHeading::FixedAtSpawn {
            comet.fixed_velocity = Some(comet.aim(size));
        }
        comet
    }

    /// Build an active comet with explicit parameters.
    pub fn new(edge: Edge, position: Vec2, speed: f32, opacity: f32, tail_length: f32) -> Self {
        Self {
            position,
            length: tail_length,
            tail_length,
            speed,
            opacity,
            active: true,
            edge,
            fixed_velocity: None,
        }
    }

    /// Displacement per frame toward the far corner from the current position.
    fn aim(&self, size: SurfaceSize) -> Vec2 {
        let to_corner = size.far_corner() - self.position;
        let angle = to_corner.y.atan2(to_corner.x);
        Vec2::new(angle.cos(), angle.sin()) * self.speed
    }

    /// Displacement this comet will move by on the next step.
    pub fn velocity(&self, size: SurfaceSize) -> Vec2 {
        self.fixed_velocity.unwrap_or_else(|| self.aim(size))
    }

    /// Where the tail ends for a given velocity.
    pub fn tail_end(&self, velocity: Vec2) -> Vec2 {
        self.position - velocity * self.tail_length
    }

    /// Draw, then move one step. Returns `false` and deactivates once the
    /// comet has left the padded surface bounds.
    pub fn advance(&mut self, size: SurfaceSize, ctx: &mut impl DrawContext) -> bool {
        let velocity = self.velocity(size);
        let head = Rgba::white(self.opacity);

        ctx.fill_circle(self.position, HEAD_RADIUS, head);
        ctx.stroke_fading_line(self.position, self.tail_end(velocity), TAIL_WIDTH, head);

        self.position += velocity;
        if self.is_out_of_bounds(size) {
            self.active = false;
        }
        self.active
    }

    /// Whether the head is outside the surface padded by the tail length.
    pub fn is_out_of_bounds(&self, size: SurfaceSize) -> bool {
        let pad = self.tail_length;
        let Vec2 { x, y } = self.position;
        x < -pad || x > size.width_f32() + pad || y < -pad || y > size.height_f32() + pad
    }
}
