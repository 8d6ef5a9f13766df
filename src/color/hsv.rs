//! Floating point HSV colors
//!
//! Hue is in degrees, saturation and value are in `0.0..=1.0`. This is the
//! color space the animation patterns are designed in. Conversion quantizes
//! to `smart_leds::hsv::Hsv`, whose hue runs on a 0-255 circle, and lets
//! `hsv2rgb` produce the strip's native [`Rgb`].

use libm::fmodf;
use smart_leds::hsv::{Hsv, hsv2rgb};

use crate::color::Rgb;

/// Steps of the `Hsv` hue circle
const HUE_STEPS: f32 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HsvColor {
    /// Hue in degrees, wraps around at 360
    pub hue: f32,
    /// Saturation (0.0 - 1.0)
    pub sat: f32,
    /// Value (0.0 - 1.0)
    pub val: f32,
}

impl HsvColor {
    pub const fn new(hue: f32, sat: f32, val: f32) -> Self {
        Self { hue, sat, val }
    }

    /// Quantize to the 8-bit HSV representation
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_hsv8(self) -> Hsv {
        let mut hue = fmodf(self.hue, 360.0);
        if hue < 0.0 {
            hue += 360.0;
        }
        let unit = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;

        Hsv {
            hue: (hue / 360.0 * HUE_STEPS).clamp(0.0, 255.0) as u8,
            sat: unit(self.sat),
            val: unit(self.val),
        }
    }

    /// Convert to RGB
    pub fn to_rgb(self) -> Rgb {
        hsv2rgb(self.to_hsv8())
    }
}

impl From<HsvColor> for Rgb {
    fn from(color: HsvColor) -> Self {
        color.to_rgb()
    }
}
