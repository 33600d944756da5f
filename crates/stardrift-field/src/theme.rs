//! Display mode signal and the surface layer fade that follows it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Layer opacity while the field is visible.
pub const VISIBLE_LAYER_OPACITY: f32 = 0.7;
/// Duration of the fade between visible and hidden.
pub const LAYER_FADE: Duration = Duration::from_millis(1000);

/// The active visual theme.
///
/// Only [`DisplayMode::Dark`] activates the field. `System` is not resolved
/// against the OS preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    Light,
    Dark,
    #[default]
    System,
}

impl DisplayMode {
    pub fn is_dark(self) -> bool {
        self == DisplayMode::Dark
    }

    fn to_bits(self) -> u8 {
        match self {
            DisplayMode::Light => 0,
            DisplayMode::Dark => 1,
            DisplayMode::System => 2,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => DisplayMode::Light,
            1 => DisplayMode::Dark,
            _ => DisplayMode::System,
        }
    }
}

/// Shared, cheaply cloned display mode cell.
///
/// The theme owner writes through [`ThemeSignal::set`]; the field only reads.
#[derive(Clone, Debug)]
pub struct ThemeSignal {
    mode: Arc<AtomicU8>,
}

impl ThemeSignal {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode: Arc::new(AtomicU8::new(mode.to_bits())),
        }
    }

    pub fn get(&self) -> DisplayMode {
        DisplayMode::from_bits(self.mode.load(Ordering::Acquire))
    }

    pub fn set(&self, mode: DisplayMode) {
        self.mode.store(mode.to_bits(), Ordering::Release);
    }
}

impl Default for ThemeSignal {
    fn default() -> Self {
        Self::new(DisplayMode::default())
    }
}

/// Linear opacity transition of the surface layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerFade {
    from: f32,
    to: f32,
    start: Duration,
}

impl LayerFade {
    /// A settled fade for the given mode.
    pub fn settled(mode: DisplayMode) -> Self {
        let target = Self::target_for(mode);
        Self {
            from: target,
            to: target,
            start: Duration::ZERO,
        }
    }

    fn target_for(mode: DisplayMode) -> f32 {
        if mode.is_dark() {
            VISIBLE_LAYER_OPACITY
        } else {
            0.0
        }
    }

    /// Retarget toward the opacity for `mode`, starting from wherever the
    /// fade currently is at `now`.
    pub fn retarget(&mut self, mode: DisplayMode, now: Duration) {
        let target = Self::target_for(mode);
        if target == self.to {
            return;
        }
        self.from = self.value(now);
        self.to = target;
        self.start = now;
    }

    /// Opacity at `now`.
    pub fn value(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.start).as_secs_f32();
        let t = (elapsed / LAYER_FADE.as_secs_f32()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    /// Final opacity of the current transition.
    pub fn target(&self) -> f32 {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_dark_is_dark() {
        assert!(DisplayMode::Dark.is_dark());
        assert!(!DisplayMode::Light.is_dark());
        assert!(!DisplayMode::System.is_dark());
    }

    #[test]
    fn test_signal_shared_between_clones() {
        let owner = ThemeSignal::new(DisplayMode::Light);
        let reader = owner.clone();
        assert_eq!(reader.get(), DisplayMode::Light);
        owner.set(DisplayMode::Dark);
        assert_eq!(reader.get(), DisplayMode::Dark);
        owner.set(DisplayMode::System);
        assert_eq!(reader.get(), DisplayMode::System);
    }

    #[test]
    fn test_settled_fade_values() {
        assert_eq!(
            LayerFade::settled(DisplayMode::Dark).value(Duration::from_secs(5)),
            VISIBLE_LAYER_OPACITY
        );
        assert_eq!(
            LayerFade::settled(DisplayMode::Light).value(Duration::ZERO),
            0.0
        );
    }

    #[test]
    fn test_fade_in_is_linear_over_one_second() {
        let mut fade = LayerFade::settled(DisplayMode::Light);
        let start = Duration::from_secs(2);
        fade.retarget(DisplayMode::Dark, start);
        assert_eq!(fade.value(start), 0.0);
        let half = fade.value(start + Duration::from_millis(500));
        assert!((half - 0.35).abs() < 1e-5, "half-way opacity {half}");
        assert_eq!(fade.value(start + LAYER_FADE), VISIBLE_LAYER_OPACITY);
        assert_eq!(fade.value(start + Duration::from_secs(10)), VISIBLE_LAYER_OPACITY);
    }

    #[test]
    fn test_retarget_mid_fade_starts_from_current_value() {
        let mut fade = LayerFade::settled(DisplayMode::Dark);
        fade.retarget(DisplayMode::Light, Duration::ZERO);
        let mid = Duration::from_millis(250);
        fade.retarget(DisplayMode::Dark, mid);
        let v = fade.value(mid);
        assert!((v - 0.525).abs() < 1e-5, "opacity after reversal {v}");
        assert_eq!(fade.target(), VISIBLE_LAYER_OPACITY);
    }

    #[test]
    fn test_retarget_same_mode_is_noop() {
        let mut fade = LayerFade::settled(DisplayMode::Dark);
        let before = fade;
        fade.retarget(DisplayMode::Dark, Duration::from_secs(3));
        assert_eq!(fade, before);
    }
}
