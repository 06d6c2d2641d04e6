//! Time-based easing for the camera intro transition

use std::time::Duration;

/// Easing curve applied to normalized progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    CubicOut,
}

impl Easing {
    /// Map progress `t` (clamped to 0..=1) through the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

/// Interpolates a 3-vector from `from` to `to` over a fixed duration
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: [f32; 3], to: [f32; 3], duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized progress after `elapsed`
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Value after `elapsed`; exactly `to` once the duration has passed
    pub fn sample(&self, elapsed: Duration) -> [f32; 3] {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let k = self.easing.apply(self.progress(elapsed));
        [
            self.from[0] + (self.to[0] - self.from[0]) * k,
            self.from[1] + (self.to[1] - self.from[1]) * k,
            self.from[2] + (self.to[2] - self.from[2]) * k,
        ]
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}
