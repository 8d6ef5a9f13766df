use super::{Pattern, Playback};
use crate::color::Rgb;

/// Fills all LEDs with one color, independent of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solid {
    color: Rgb,
}

impl Solid {
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Pattern for Solid {
    fn draw(&mut self, _playback: &mut Playback, leds: &mut [Rgb], _delta_secs: f32) {
        leds.fill(self.color);
    }
}
