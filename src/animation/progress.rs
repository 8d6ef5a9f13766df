//! Completion bar driven by [`Animation::parameter`](super::Animation::parameter)
//!
//! The phase is the completion fraction. Time does not move it, and a play
//! does not reset it. Reaching 1.0 ends the animation whatever loop count it
//! was played with.

use super::{Pattern, Playback};
use crate::color::{Rgb, scale};

/// Brightness of pixels well past the leading edge
const DIM: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressBar {
    color: Rgb,
}

impl ProgressBar {
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Pattern for ProgressBar {
    #[allow(clippy::cast_precision_loss)]
    fn draw(&mut self, playback: &mut Playback, leds: &mut [Rgb], _delta_secs: f32) {
        let completion = playback.phase();
        if completion >= 1.0 {
            playback.finish();
        }

        let extent = completion * (leds.len() as f32 - 1.0).max(0.0);
        for (index, led) in leds.iter_mut().enumerate() {
            let brightness = (extent - index as f32 + 1.0).clamp(DIM, 1.0);
            *led = scale(self.color, brightness);
        }
    }

    fn parameter(&mut self, playback: &mut Playback, value: f32) {
        playback.set_phase(value);
    }
}
