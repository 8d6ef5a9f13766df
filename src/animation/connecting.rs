//! Bouncing spot shown while a connection is being set up

use libm::fabsf;

use super::{Pattern, Playback, loop_step};
use crate::color::{HsvColor, Rgb};

const PERIOD_SECS: f32 = 2.0;
const HUE: f32 = 200.0;
const SATURATION: f32 = 0.7;
const PEAK: f32 = 0.5;
/// Pixel positions the spot covers each way
const SPAN: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectingIndicator;

impl ConnectingIndicator {
    pub const fn new() -> Self {
        Self
    }

    /// Spot position at `phase`: out during the first half, back during the second
    fn location(phase: f32) -> f32 {
        if phase < 0.5 {
            phase * SPAN
        } else {
            SPAN - phase * SPAN
        }
    }
}

impl Pattern for ConnectingIndicator {
    #[allow(clippy::cast_precision_loss)]
    fn draw(&mut self, playback: &mut Playback, leds: &mut [Rgb], delta_secs: f32) {
        playback.advance(loop_step(delta_secs, PERIOD_SECS), 1.0);

        let location = Self::location(playback.phase());
        for (index, led) in leds.iter_mut().enumerate() {
            let value = (1.0 - fabsf(location - index as f32)).clamp(0.0, 1.0);
            *led = HsvColor::new(HUE, SATURATION, PEAK * value).to_rgb();
        }
    }
}
