//! Gaussian lobe sweeping along the strip

use libm::expf;

use super::{Pattern, Playback, loop_step};
use crate::color::{HsvColor, Rgb};

const PERIOD_SECS: f32 = 16.0;
const HUE: f32 = 147.0;
const SATURATION: f32 = 0.8;
const PEAK: f32 = 0.4;
/// Lobe width in pixels
const SIGMA: f32 = 2.0;
/// Pixels the lobe travels per loop
const TRAVEL: f32 = 16.0;
/// Lobe center at the start of a loop, off the strip's head
const START: f32 = -4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wave;

impl Wave {
    pub const fn new() -> Self {
        Self
    }
}

impl Pattern for Wave {
    #[allow(clippy::cast_precision_loss)]
    fn draw(&mut self, playback: &mut Playback, leds: &mut [Rgb], delta_secs: f32) {
        playback.advance(loop_step(delta_secs, PERIOD_SECS), 1.0);

        let center = playback.phase() * TRAVEL + START;
        for (index, led) in leds.iter_mut().enumerate() {
            let distance = (index as f32 - center) / SIGMA;
            let value = PEAK * expf(-0.5 * distance * distance);
            *led = HsvColor::new(HUE, SATURATION, value).to_rgb();
        }
    }
}
