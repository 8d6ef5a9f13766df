//! Animations with compile-time known variants
//!
//! An [`Animation`] pairs the [`Playback`] bookkeeping every animation has
//! with one [`AnimationKind`], the pattern that draws the frames. Patterns
//! implement [`Pattern`]; the kind enum dispatches to them without heap
//! allocation.

mod blank;
mod connecting;
mod flash;
mod playback;
mod progress;
mod pulse;
mod solid;
mod wave;

use embassy_time::Instant;

pub use blank::Blank;
pub use connecting::ConnectingIndicator;
pub use flash::Flash;
pub use playback::{AnimationState, INFINITE, Playback};
pub use progress::ProgressBar;
pub use pulse::Pulse;
pub use solid::Solid;
pub use wave::Wave;

use crate::color::Rgb;

/// Convert an elapsed time to loop units of a pattern with the given period
#[inline]
pub(crate) fn loop_step(delta_secs: f32, period_secs: f32) -> f32 {
    delta_secs / period_secs
}

pub trait Pattern {
    /// Advance the phase in `playback` and draw one full frame
    fn draw(&mut self, playback: &mut Playback, leds: &mut [Rgb], delta_secs: f32);

    /// Accept an externally driven value
    fn parameter(&mut self, _playback: &mut Playback, _value: f32) {}
}

/// Pattern slot - enum containing every pattern
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationKind {
    Blank(Blank),
    Solid(Solid),
    Flash(Flash),
    Wave(Wave),
    Pulse(Pulse),
    Connecting(ConnectingIndicator),
    Progress(ProgressBar),
}

impl AnimationKind {
    fn draw(&mut self, playback: &mut Playback, leds: &mut [Rgb], delta_secs: f32) {
        match self {
            Self::Blank(pattern) => pattern.draw(playback, leds, delta_secs),
            Self::Solid(pattern) => pattern.draw(playback, leds, delta_secs),
            Self::Flash(pattern) => pattern.draw(playback, leds, delta_secs),
            Self::Wave(pattern) => pattern.draw(playback, leds, delta_secs),
            Self::Pulse(pattern) => pattern.draw(playback, leds, delta_secs),
            Self::Connecting(pattern) => pattern.draw(playback, leds, delta_secs),
            Self::Progress(pattern) => pattern.draw(playback, leds, delta_secs),
        }
    }

    fn parameter(&mut self, playback: &mut Playback, value: f32) {
        match self {
            Self::Blank(pattern) => pattern.parameter(playback, value),
            Self::Solid(pattern) => pattern.parameter(playback, value),
            Self::Flash(pattern) => pattern.parameter(playback, value),
            Self::Wave(pattern) => pattern.parameter(playback, value),
            Self::Pulse(pattern) => pattern.parameter(playback, value),
            Self::Connecting(pattern) => pattern.parameter(playback, value),
            Self::Progress(pattern) => pattern.parameter(playback, value),
        }
    }
}

/// A stateful animation
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    playback: Playback,
    kind: AnimationKind,
}

impl Default for Animation {
    fn default() -> Self {
        Self::blank()
    }
}

impl From<AnimationKind> for Animation {
    fn from(kind: AnimationKind) -> Self {
        Self::new(kind)
    }
}

impl Animation {
    pub const fn new(kind: AnimationKind) -> Self {
        Self {
            playback: Playback::new(),
            kind,
        }
    }

    /// Every pixel off
    pub const fn blank() -> Self {
        Self::new(AnimationKind::Blank(Blank))
    }

    /// Every pixel `color`
    pub const fn solid(color: Rgb) -> Self {
        Self::new(AnimationKind::Solid(Solid::new(color)))
    }

    pub const fn flash(color: Rgb) -> Self {
        Self::new(AnimationKind::Flash(Flash::new(color)))
    }

    pub const fn wave() -> Self {
        Self::new(AnimationKind::Wave(Wave::new()))
    }

    pub const fn pulse(color: Rgb) -> Self {
        Self::new(AnimationKind::Pulse(Pulse::new(color)))
    }

    pub const fn connecting() -> Self {
        Self::new(AnimationKind::Connecting(ConnectingIndicator::new()))
    }

    pub const fn progress(color: Rgb) -> Self {
        Self::new(AnimationKind::Progress(ProgressBar::new(color)))
    }

    pub const fn kind(&self) -> &AnimationKind {
        &self.kind
    }

    pub const fn playback(&self) -> &Playback {
        &self.playback
    }

    pub const fn state(&self) -> AnimationState {
        self.playback.state()
    }

    pub const fn remaining_loops(&self) -> i32 {
        self.playback.remaining_loops()
    }

    pub const fn phase(&self) -> f32 {
        self.playback.phase()
    }

    /// Start playing for `loops` loops, [`INFINITE`] for no end
    ///
    /// Zero loops is allowed and stops after the next frame.
    pub fn play(&mut self, loops: i32) {
        self.playback.play(loops, Instant::now());
    }

    /// Stop right away, whatever is left of the loops
    pub fn stop(&mut self) {
        self.playback.stop();
    }

    /// Forward an externally driven value to the pattern
    pub fn parameter(&mut self, value: f32) {
        self.kind.parameter(&mut self.playback, value);
    }

    /// Advance by `delta_secs` and draw one frame into `leds`
    pub fn update(&mut self, leds: &mut [Rgb], delta_secs: f32) {
        self.kind.draw(&mut self.playback, leds, delta_secs);
        self.playback.complete_update(Instant::now());
    }
}
