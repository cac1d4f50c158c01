//! Unit types: Dp and conversions

/// Density-independent pixels
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Dp(pub f32);

impl Dp {
    pub fn to_px(&self, density: f32) -> f32 {
        self.0 * density
    }

    /// Converts to whole device pixels, truncating like the platform's
    /// `(int) (dp * density)` conversions.
    pub fn to_px_int(&self, density: f32) -> i32 {
        (self.0 * density) as i32
    }
}
