//! Frame scheduling and timing utilities.
//!
//! Frames are paced against absolute deadlines: each deadline is the
//! previous one plus the frame period, so a late frame does not shift the
//! ones after it. The animations themselves advance by measured time, not
//! by the nominal period.

use embassy_time::{Duration, Instant};

use crate::animator::Animator;
use crate::error::Error;
use crate::waveform::WaveformPeripheral;

/// Target frame rate
pub const TARGET_FPS: u64 = 30;

/// Frame period at [`TARGET_FPS`]
pub const FRAME_DURATION: Duration = Duration::from_hz(TARGET_FPS);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (zero if behind schedule).
    pub sleep_duration: Duration,
    /// Outcome of the frame's transmission
    pub outcome: Result<(), Error>,
}

/// Fixed-rate render loop driving an [`Animator`]
///
/// Either call [`tick`](Self::tick) with the current time and sleep for the
/// returned duration with a platform timer, or hand the render core over to
/// [`run`](Self::run), which busy-waits between frames and answers pause
/// requests on the encoder's [`Rendezvous`](crate::Rendezvous) while it
/// waits.
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(animator);
/// scheduler.run();
/// ```
pub struct FrameScheduler<'a, P: WaveformPeripheral, const N: usize, const MAX_LEDS: usize> {
    animator: Animator<'a, P, N, MAX_LEDS>,
    next_frame: Option<Instant>,
    frame_duration: Duration,
    attached: bool,
}

impl<'a, P: WaveformPeripheral, const N: usize, const MAX_LEDS: usize>
    FrameScheduler<'a, P, N, MAX_LEDS>
{
    /// Create a scheduler running at [`TARGET_FPS`]
    pub fn new(animator: Animator<'a, P, N, MAX_LEDS>) -> Self {
        Self::with_frame_duration(animator, FRAME_DURATION)
    }

    /// Create a scheduler with a custom frame period
    pub fn with_frame_duration(animator: Animator<'a, P, N, MAX_LEDS>, frame_duration: Duration) -> Self {
        Self {
            animator,
            next_frame: None,
            frame_duration,
            attached: false,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// The first call schedules from `now`; later calls schedule from the
    /// previous deadline. The caller waits until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let deadline = self.next_frame.unwrap_or(now);
        let outcome = self.animator.tick(now);

        let next_deadline = deadline + self.frame_duration;
        self.next_frame = Some(next_deadline);

        FrameResult {
            next_deadline,
            sleep_duration: next_deadline
                .checked_duration_since(now)
                .unwrap_or(Duration::from_ticks(0)),
            outcome,
        }
    }

    /// Render one frame, then wait for its deadline
    ///
    /// Registers this loop as the render context of the encoder's
    /// rendezvous on first use and parks whenever a pause is requested.
    pub fn step(&mut self) -> FrameResult {
        let rendezvous = self.animator.encoder().rendezvous();
        if !self.attached {
            rendezvous.attach_render();
            self.attached = true;
        }

        rendezvous.checkpoint();
        let result = self.tick(Instant::now());
        while Instant::now() < result.next_deadline {
            rendezvous.checkpoint();
            core::hint::spin_loop();
        }
        result
    }

    /// Render forever
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Get a reference to the animator.
    pub fn animator(&self) -> &Animator<'a, P, N, MAX_LEDS> {
        &self.animator
    }

    /// Get a mutable reference to the animator.
    pub fn animator_mut(&mut self) -> &mut Animator<'a, P, N, MAX_LEDS> {
        &mut self.animator
    }
}

impl<P: WaveformPeripheral, const N: usize, const MAX_LEDS: usize> Drop
    for FrameScheduler<'_, P, N, MAX_LEDS>
{
    fn drop(&mut self) {
        if self.attached {
            self.animator.encoder().rendezvous().detach_render();
        }
    }
}
