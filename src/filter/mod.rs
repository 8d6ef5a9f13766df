//! Output calibration
//!
//! Every frame passes through the same fixed pipeline before it reaches the
//! wire: per-channel color balance and global brightness, clamped to the
//! channel range, then the gamma curve.

use crate::color::Rgb;

mod color_balance;
mod gamma;

pub use color_balance::ColorBalance;
pub use gamma::GammaCurve;

/// Default gamma exponent
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Default global brightness
pub const DEFAULT_BRIGHTNESS: f32 = 1.0;

pub(crate) trait Filter {
    /// Apply the filter to a frame in place
    fn apply(&self, frame: &mut [Rgb]);
}

/// Calibration settings of a strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Per-channel multipliers
    pub color_balance: ColorBalance,
    /// Global brightness multiplier
    pub brightness: f32,
    /// Gamma exponent
    pub gamma: f32,
}

impl Calibration {
    pub const fn new() -> Self {
        Self {
            color_balance: ColorBalance::NEUTRAL,
            brightness: DEFAULT_BRIGHTNESS,
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

/// Balance and brightness stage
#[derive(Debug, Clone, Copy)]
struct Gain {
    balance: ColorBalance,
    brightness: f32,
}

impl Filter for Gain {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn apply(&self, frame: &mut [Rgb]) {
        let gain = |value: u8, factor: f32| {
            (f32::from(value) * factor * self.brightness).clamp(0.0, 255.0) as u8
        };
        for pixel in frame.iter_mut() {
            pixel.r = gain(pixel.r, self.balance.r);
            pixel.g = gain(pixel.g, self.balance.g);
            pixel.b = gain(pixel.b, self.balance.b);
        }
    }
}

/// Calibration pipeline applied by the strip encoder
#[derive(Debug, Clone)]
pub(crate) struct CalibrationPipeline {
    gain: Gain,
    gamma: GammaCurve,
}

impl CalibrationPipeline {
    pub(crate) fn new(calibration: &Calibration) -> Self {
        Self {
            gain: Gain {
                balance: calibration.color_balance,
                brightness: calibration.brightness,
            },
            gamma: GammaCurve::new(calibration.gamma),
        }
    }

    pub(crate) fn calibration(&self) -> Calibration {
        Calibration {
            color_balance: self.gain.balance,
            brightness: self.gain.brightness,
            gamma: self.gamma.exponent(),
        }
    }

    pub(crate) fn set_color_balance(&mut self, balance: ColorBalance) {
        self.gain.balance = balance;
    }

    pub(crate) fn set_brightness(&mut self, brightness: f32) {
        self.gain.brightness = brightness;
    }

    /// Rebuilds the lookup table, so keep this off the per-frame path
    #[allow(clippy::float_cmp)]
    pub(crate) fn set_gamma(&mut self, gamma: f32) {
        if gamma != self.gamma.exponent() {
            self.gamma = GammaCurve::new(gamma);
        }
    }

    /// Apply all stages to a frame, in order
    pub(crate) fn apply(&self, frame: &mut [Rgb]) {
        self.gain.apply(frame);
        self.gamma.apply(frame);
    }
}
