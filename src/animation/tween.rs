use crate::animation::ease::Ease;
use crate::foundation::math::lerp;

/// Default duration for an animated scroll when the host does not animate natively.
pub const SMOOTH_SCROLL_MS: f64 = 450.0;

/// Eased interpolation of the vertical scroll offset between two positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTween {
    /// Scroll offset at the start.
    pub from: f64,
    /// Scroll offset at the end.
    pub to: f64,
    /// Host clock time the tween starts at.
    pub start_ms: f64,
    /// Length of the tween; `0` finishes immediately.
    pub duration_ms: f64,
    /// Curve applied to progress.
    pub ease: Ease,
}

impl ScrollTween {
    /// Tween of [`SMOOTH_SCROLL_MS`] with the default curve.
    pub fn new(from: f64, to: f64, start_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: SMOOTH_SCROLL_MS,
            ease: Ease::InOutCubic,
        }
    }

    /// Linear progress in `[0, 1]` at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased scroll offset at `now_ms`; exactly `to` once finished.
    pub fn position_at(&self, now_ms: f64) -> f64 {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to;
        }
        lerp(self.from, self.to, self.ease.apply(t))
    }

    /// Whether `now_ms` is at or past the end.
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
