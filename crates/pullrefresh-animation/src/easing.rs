//! Easing curves.

use std::f32::consts::PI;

/// Easing functions applied to a linear time fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// Cosine ramp: starts and ends slowly, fastest through the middle.
    AccelerateDecelerate,
    /// Starts fast and decelerates; the factor controls how strongly.
    /// A factor of `1.0` is a plain quadratic ease-out.
    Decelerate(f32),
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        let fraction = fraction.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => fraction,
            Easing::AccelerateDecelerate => ((fraction + 1.0) * PI).cos() / 2.0 + 0.5,
            Easing::Decelerate(factor) => {
                if factor == 1.0 {
                    1.0 - (1.0 - fraction) * (1.0 - fraction)
                } else {
                    1.0 - (1.0 - fraction).powf(2.0 * factor)
                }
            }
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::AccelerateDecelerate
    }
}
