use super::{Pattern, Playback};
use crate::color::{BLACK, Rgb};

/// All pixels off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Blank;

impl Pattern for Blank {
    fn draw(&mut self, _playback: &mut Playback, leds: &mut [Rgb], _delta_secs: f32) {
        leds.fill(BLACK);
    }
}
