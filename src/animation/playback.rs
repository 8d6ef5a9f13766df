use embassy_time::Instant;
use libm::ceilf;

/// Lifecycle of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// Not playing; a base layer keeps drawing, an overlay is dropped
    #[default]
    Stopped,
    /// `play` was called and no frame has been drawn since
    Starting,
    Playing,
}

/// Loop count that never runs out
pub const INFINITE: i32 = -1;

/// Phase and loop bookkeeping shared by every pattern
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Playback {
    phase: f32,
    loops: i32,
    state: AnimationState,
    started_at: Option<Instant>,
    last_update: Option<Instant>,
}

impl Playback {
    pub const fn new() -> Self {
        Self {
            phase: 0.0,
            loops: 0,
            state: AnimationState::Stopped,
            started_at: None,
            last_update: None,
        }
    }

    /// Normalized position inside the current loop
    pub const fn phase(&self) -> f32 {
        self.phase
    }

    /// Loops left to play, negative for unbounded
    pub const fn remaining_loops(&self) -> i32 {
        self.loops
    }

    pub const fn state(&self) -> AnimationState {
        self.state
    }

    pub const fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub const fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    pub(crate) fn play(&mut self, loops: i32, now: Instant) {
        self.loops = loops;
        self.state = AnimationState::Starting;
        self.started_at = Some(now);
    }

    pub(crate) fn stop(&mut self) {
        self.state = AnimationState::Stopped;
    }

    pub(crate) fn set_phase(&mut self, phase: f32) {
        self.phase = phase;
    }

    /// End the animation at the next state evaluation
    pub(crate) fn finish(&mut self) {
        self.loops = 0;
    }

    /// Move the phase forward by `step` loops
    ///
    /// A fresh play starts over from zero. Every whole unit the phase runs
    /// past `wrap_len` is folded back and counts as one finished loop.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn advance(&mut self, step: f32, wrap_len: f32) {
        if self.state == AnimationState::Starting {
            self.phase = 0.0;
        }
        self.phase += step;
        if !self.phase.is_finite() {
            self.phase = 0.0;
        }

        if self.phase > wrap_len {
            let wraps = ceilf(self.phase - wrap_len);
            self.phase = (self.phase - wraps).clamp(wrap_len - 1.0, wrap_len);
            if self.loops > 0 {
                self.loops = self.loops.saturating_sub(wraps as i32).max(0);
            }
        }
    }

    /// State transitions that follow a drawn frame
    pub(crate) fn complete_update(&mut self, now: Instant) {
        if self.state == AnimationState::Starting {
            self.state = AnimationState::Playing;
        }
        if self.loops == 0 {
            self.state = AnimationState::Stopped;
        }
        self.last_update = Some(now);
    }
}
