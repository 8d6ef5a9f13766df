//! Pause handshake between the render loop and storage writers.
//!
//! Flash erase and program operations stall instruction fetch from flash
//! for every core. Before touching storage, the control context asks the
//! render context to park in RAM at a known point, and the render context
//! acknowledges once it is there. A frame transmission in progress is
//! never interrupted: the request waits for it to finish.
//!
//! ```ignore
//! static RENDEZVOUS: Rendezvous = Rendezvous::new();
//!
//! // control context
//! let pause = RENDEZVOUS.pause_render();
//! write_settings_to_flash();
//! RENDEZVOUS.resume_render(pause);
//! ```

use core::cell::Cell;

use critical_section::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Transmitting,
    PauseRequested,
    Paused,
}

#[derive(Clone, Copy)]
struct Handshake {
    phase: Phase,
    /// A render context is running and answers pause requests
    render_attached: bool,
}

/// Mutual exclusion between frame transmission and storage writes
pub struct Rendezvous {
    handshake: Mutex<Cell<Handshake>>,
}

/// Proof that the render context is parked
///
/// Rendering resumes when the token is passed to
/// [`Rendezvous::resume_render`] or dropped.
#[must_use = "rendering resumes as soon as the token is dropped"]
pub struct PauseToken<'a> {
    rendezvous: &'a Rendezvous,
}

impl PauseToken<'_> {
    pub fn resume(self) {
        drop(self);
    }
}

impl Drop for PauseToken<'_> {
    fn drop(&mut self) {
        self.rendezvous.set_phase(Phase::Idle);
        debug!("render resumed");
    }
}

impl Rendezvous {
    pub const fn new() -> Self {
        Self {
            handshake: Mutex::new(Cell::new(Handshake {
                phase: Phase::Idle,
                render_attached: false,
            })),
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut Handshake) -> R) -> R {
        critical_section::with(|cs| {
            let cell = self.handshake.borrow(cs);
            let mut handshake = cell.get();
            let result = f(&mut handshake);
            cell.set(handshake);
            result
        })
    }

    fn phase(&self) -> Phase {
        critical_section::with(|cs| self.handshake.borrow(cs).get().phase)
    }

    fn set_phase(&self, phase: Phase) {
        self.update(|handshake| handshake.phase = phase);
    }

    /// Spin until `done` reports true
    fn spin_until(&self, mut done: impl FnMut(&mut Handshake) -> bool) {
        while !self.update(&mut done) {
            core::hint::spin_loop();
        }
    }

    /// Announce that a render context services [`checkpoint`](Self::checkpoint)
    ///
    /// Until one is attached, pause requests are granted immediately.
    pub fn attach_render(&self) {
        self.update(|handshake| handshake.render_attached = true);
    }

    /// Withdraw the render context; a pending pause request is granted
    pub fn detach_render(&self) {
        self.update(|handshake| {
            handshake.render_attached = false;
            if handshake.phase == Phase::PauseRequested {
                handshake.phase = Phase::Paused;
            }
        });
    }

    pub fn is_render_attached(&self) -> bool {
        critical_section::with(|cs| self.handshake.borrow(cs).get().render_attached)
    }

    /// Whether a pause is currently granted
    pub fn is_render_paused(&self) -> bool {
        self.phase() == Phase::Paused
    }

    /// Render side: run one frame transmission
    ///
    /// Parks first if a pause is requested or granted, and keeps storage
    /// writers out until `transmit` returns.
    pub fn transmit<R>(&self, transmit: impl FnOnce() -> R) -> R {
        self.spin_until(|handshake| match handshake.phase {
            Phase::Idle => {
                handshake.phase = Phase::Transmitting;
                true
            }
            Phase::PauseRequested => {
                handshake.phase = Phase::Paused;
                false
            }
            Phase::Paused | Phase::Transmitting => false,
        });

        let result = transmit();
        self.set_phase(Phase::Idle);
        result
    }

    /// Render side: park here while a pause is requested
    ///
    /// Returns whether the caller was parked.
    pub fn checkpoint(&self) -> bool {
        let parked = self.update(|handshake| {
            if handshake.phase == Phase::PauseRequested {
                handshake.phase = Phase::Paused;
                true
            } else {
                false
            }
        });
        if parked {
            self.spin_until(|handshake| handshake.phase != Phase::Paused);
        }
        parked
    }

    /// Control side: stop the render context before a storage write
    ///
    /// Waits for a transmission in progress to finish, then for the render
    /// context to acknowledge. Must not be called from the render context.
    pub fn pause_render(&self) -> PauseToken<'_> {
        self.spin_until(|handshake| {
            if handshake.phase != Phase::Idle {
                return false;
            }
            handshake.phase = if handshake.render_attached {
                Phase::PauseRequested
            } else {
                Phase::Paused
            };
            true
        });
        self.spin_until(|handshake| handshake.phase == Phase::Paused);
        debug!("render paused");

        PauseToken { rendezvous: self }
    }

    /// Control side: let the render context continue
    pub fn resume_render(&self, token: PauseToken<'_>) {
        debug_assert!(core::ptr::eq(token.rendezvous, self));
        token.resume();
    }
}

impl Default for Rendezvous {
    fn default() -> Self {
        Self::new()
    }
}
