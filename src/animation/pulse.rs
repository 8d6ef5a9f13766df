//! Slow breathing with a trapezoid envelope

use super::{Pattern, Playback, loop_step};
use crate::color::{Rgb, scale};

const PERIOD_SECS: f32 = 16.0;
const RISE_END: f32 = 0.3;
const FALL_START: f32 = 0.7;
const FLOOR: f32 = 0.1;
const SPAN: f32 = 0.333;

/// Envelope value at `phase`: ramps up to 1.0, holds, ramps back to 0.0
fn envelope(phase: f32) -> f32 {
    if phase < RISE_END {
        phase / RISE_END
    } else if phase < FALL_START {
        1.0
    } else {
        ((1.0 - phase) / (1.0 - FALL_START)).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    color: Rgb,
}

impl Pulse {
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Pattern for Pulse {
    fn draw(&mut self, playback: &mut Playback, leds: &mut [Rgb], delta_secs: f32) {
        playback.advance(loop_step(delta_secs, PERIOD_SECS), 1.0);

        let brightness = envelope(playback.phase()) * SPAN + FLOOR;
        leds.fill(scale(self.color, brightness));
    }
}
