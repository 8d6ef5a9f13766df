use libm::powf;

use super::Filter;
use crate::color::Rgb;

/// Gamma curve baked into a lookup table
///
/// Entry `i` is `pow(i / 255, gamma) * 255` clamped to the channel range
/// and truncated. The table is built once per exponent so a frame only
/// costs three lookups per pixel.
#[derive(Debug, Clone)]
pub struct GammaCurve {
    exponent: f32,
    table: [u8; 256],
}

impl GammaCurve {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_cmp
    )]
    pub fn new(exponent: f32) -> Self {
        let mut table = [0u8; 256];
        for (value, entry) in (0u8..=255).zip(table.iter_mut()) {
            *entry = if exponent == 1.0 {
                value
            } else {
                let normalized = f32::from(value) / 255.0;
                (powf(normalized, exponent) * 255.0).clamp(0.0, 255.0) as u8
            };
        }
        Self { exponent, table }
    }

    /// Gamma exponent this table was built for
    pub const fn exponent(&self) -> f32 {
        self.exponent
    }

    /// Map one channel value through the curve
    #[inline]
    pub const fn correct(&self, value: u8) -> u8 {
        self.table[value as usize]
    }
}

impl Filter for GammaCurve {
    fn apply(&self, frame: &mut [Rgb]) {
        for pixel in frame.iter_mut() {
            pixel.r = self.correct(pixel.r);
            pixel.g = self.correct(pixel.g);
            pixel.b = self.correct(pixel.b);
        }
    }
}
