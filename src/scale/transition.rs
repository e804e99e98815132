// Animated movement of the time-scale slider.
//
// The UI tweens the scale value when the user jumps between presets; each
// intermediate value is fed back into a full layout pass.

use serde::Serialize;

/// Smoothstep easing: `t²(3 - 2t)`, with `t` clamped to `[0, 1]`.
pub fn smooth_step(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ScaleTransition {
    pub from: f64,
    pub to: f64,
}

impl ScaleTransition {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// -1 when zooming out (towards smaller scale values), +1 otherwise.
    pub fn direction(&self) -> i8 {
        if self.from > self.to { -1 } else { 1 }
    }

    pub fn magnitude(&self) -> f64 {
        (self.from - self.to).abs()
    }

    /// Linearly interpolated scale value at `progress` in `[0, 1]`.
    pub fn at(&self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        self.from + (self.to - self.from) * p
    }

    /// Scale value at `progress` with smoothstep easing.
    pub fn eased_at(&self, progress: f64) -> f64 {
        self.at(smooth_step(progress))
    }
}
