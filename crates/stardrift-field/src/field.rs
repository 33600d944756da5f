//! The particle field renderer: owns the star and comet sets, redraws them
//! once per presented frame while the display mode is dark, and idles (still
//! scheduled) otherwise.

use std::time::Duration;

use crate::comet::{Comet, StreakHeading};
use crate::random::RandomSource;
use crate::scheduler::{FrameRequest, FrameScheduler, FrameTick};
use crate::star::{self, Star};
use crate::surface::{DrawContext, SurfaceHandle, SurfaceSize};
use crate::theme::{DisplayMode, LayerFade, ThemeSignal};
use crate::viewport::{ResizeSubscription, Viewport};

/// Surface area per star.
pub const DEFAULT_PIXELS_PER_STAR: u32 = 3000;
/// Most comets alive at once.
pub const DEFAULT_MAX_ACTIVE_STREAKS: usize = 3;
/// Per-frame probability of attempting a comet spawn.
pub const DEFAULT_STREAK_SPAWN_CHANCE: f32 = 0.005;

/// Tunables for a field. Defaults reproduce the stock effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldParams {
    pub pixels_per_star: u32,
    pub max_active_streaks: usize,
    pub streak_spawn_chance: f32,
    pub heading: StreakHeading,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            pixels_per_star: DEFAULT_PIXELS_PER_STAR,
            max_active_streaks: DEFAULT_MAX_ACTIVE_STREAKS,
            streak_spawn_chance: DEFAULT_STREAK_SPAWN_CHANCE,
            heading: StreakHeading::default(),
        }
    }
}

/// Everything the host provides besides the surface itself.
pub struct FieldHost<S> {
    pub viewport: Viewport,
    pub theme: ThemeSignal,
    pub scheduler: S,
}

/// What a frame callback did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Dark mode: the field was updated and redrawn.
    Drawn,
    /// Not dark: nothing drawn, next frame still requested.
    Idle,
    /// The tick was not for this field's pending request and was ignored.
    Stale,
}

/// A mounted particle field.
///
/// Created by [`ParticleField::mount`]; torn down by [`ParticleField::dispose`]
/// or by dropping it. Either path cancels the pending frame request and
/// unsubscribes from viewport resizes.
pub struct ParticleField<C, S, R>
where
    C: DrawContext,
    S: FrameScheduler,
    R: RandomSource,
{
    ctx: C,
    size: SurfaceSize,
    stars: Vec<Star>,
    comets: Vec<Comet>,
    params: FieldParams,
    theme: ThemeSignal,
    resize: Option<ResizeSubscription>,
    scheduler: S,
    pending: Option<FrameRequest>,
    rng: R,
    fade: LayerFade,
    mode: DisplayMode,
    drew_last_frame: bool,
    frames: u64,
}

impl<C, S, R> ParticleField<C, S, R>
where
    C: DrawContext,
    S: FrameScheduler,
    R: RandomSource,
{
    /// Bind to a surface and start requesting frames.
    ///
    /// Returns `None` without subscribing or scheduling anything if the
    /// surface has no drawing context yet; mount again once it does.
    pub fn mount(
        surface: impl SurfaceHandle<Context = C>,
        host: FieldHost<S>,
        rng: R,
        params: FieldParams,
    ) -> Option<Self> {
        let Some(ctx) = surface.acquire() else {
            log::debug!("drawing surface unavailable, particle field not mounted");
            return None;
        };

        let FieldHost {
            viewport,
            theme,
            scheduler,
        } = host;
        // Subscribe before reading the size so no resize slips in between.
        let resize = viewport.subscribe();
        let mode = theme.get();

        let mut field = Self {
            ctx,
            size: SurfaceSize::default(),
            stars: Vec::new(),
            comets: Vec::new(),
            params,
            theme,
            resize: Some(resize),
            scheduler,
            pending: None,
            rng,
            fade: LayerFade::settled(mode),
            mode,
            drew_last_frame: false,
            frames: 0,
        };
        field.regenerate(viewport.size());
        field.pending = Some(field.scheduler.request_frame());

        log::info!(
            "particle field mounted at {}x{} with {} stars (mode {:?})",
            field.size.width,
            field.size.height,
            field.stars.len(),
            mode
        );
        Some(field)
    }

    /// Frame callback. Deliver each tick the host presents for this field.
    pub fn on_frame(&mut self, tick: FrameTick) -> FrameOutcome {
        if self.pending != Some(tick.request) {
            log::trace!("ignoring stale frame request {}", tick.request.id());
            return FrameOutcome::Stale;
        }
        self.pending = None;

        if let Some(size) = self.resize.as_ref().and_then(ResizeSubscription::poll) {
            self.apply_size(size);
        }

        let mode = self.theme.get();
        if mode != self.mode {
            log::debug!("display mode changed {:?} -> {:?}", self.mode, mode);
            self.fade.retarget(mode, tick.timestamp);
            self.mode = mode;
        }

        let outcome = if mode.is_dark() {
            self.draw_frame();
            FrameOutcome::Drawn
        } else {
            if self.drew_last_frame {
                self.ctx.clear();
            }
            FrameOutcome::Idle
        };
        self.drew_last_frame = outcome == FrameOutcome::Drawn;
        self.frames += 1;

        self.pending = Some(self.scheduler.request_frame());
        outcome
    }

    fn draw_frame(&mut self) {
        let size = self.size;
        self.ctx.clear();

        for star in &mut self.stars {
            star.draw(&mut self.ctx);
            star.advance(size, &mut self.rng);
        }

        if self.rng.chance(self.params.streak_spawn_chance) {
            self.try_spawn_comet();
        }

        let ctx = &mut self.ctx;
        self.comets
            .retain_mut(|comet| comet.active && comet.advance(size, ctx));
    }

    fn try_spawn_comet(&mut self) -> bool {
        if self.active_comets() >= self.params.max_active_streaks {
            return false;
        }
        let comet = Comet::spawn(self.size, self.params.heading, &mut self.rng);
        log::trace!("comet spawned on {:?} edge at {}", comet.edge, comet.position);
        self.comets.push(comet);
        true
    }

    fn apply_size(&mut self, size: SurfaceSize) {
        if size != self.size {
            self.regenerate(size);
        }
    }

    /// Resize the backing store and replace the whole star set.
    fn regenerate(&mut self, size: SurfaceSize) {
        self.ctx.resize(size);
        self.size = size;
        self.stars = star::populate(size, self.params.pixels_per_star, &mut self.rng);
        log::debug!(
            "surface resized to {}x{}, regenerated {} stars",
            size.width,
            size.height,
            self.stars.len()
        );
    }

    fn teardown(&mut self) {
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        if self.resize.take().is_some() {
            log::debug!("particle field disposed after {} frames", self.frames);
        }
    }

    /// Stop requesting frames and unsubscribe from resizes.
    pub fn dispose(mut self) {
        self.teardown();
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }

    /// Number of comets currently active.
    pub fn active_comets(&self) -> usize {
        self.comets.iter().filter(|c| c.active).count()
    }

    /// Current surface size.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    /// Display mode observed on the last frame.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Whether the last frame drew.
    pub fn is_drawing(&self) -> bool {
        self.drew_last_frame
    }

    /// Frames handled so far, drawn or idle.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The outstanding frame request, if any.
    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Opacity the host should composite the surface layer at.
    pub fn layer_opacity(&self, now: Duration) -> f32 {
        self.fade.value(now)
    }
}

impl<C, S, R> Drop for ParticleField<C, S, R>
where
    C: DrawContext,
    S: FrameScheduler,
    R: RandomSource,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
