//! Square-wave strobe

use super::{Pattern, Playback, loop_step};
use crate::color::{BLACK, Rgb};

const PERIOD_SECS: f32 = 0.3;

/// Part of each period the strip is lit
const DUTY_CYCLE: f32 = 0.666;

/// Wrap length of the last loop; the extra unit is spent dark
const LAST_LOOP_WRAP: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    color: Rgb,
}

impl Flash {
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Pattern for Flash {
    fn draw(&mut self, playback: &mut Playback, leds: &mut [Rgb], delta_secs: f32) {
        let wrap_len = if playback.remaining_loops() == 1 {
            LAST_LOOP_WRAP
        } else {
            1.0
        };
        playback.advance(loop_step(delta_secs, PERIOD_SECS), wrap_len);

        let color = if playback.phase() < DUTY_CYCLE {
            self.color
        } else {
            BLACK
        };
        leds.fill(color);
    }
}
