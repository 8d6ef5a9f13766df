//! Named animations and the base/overlay selection
//!
//! The registry is shared between the control context, which registers and
//! selects animations, and the render context, which advances whatever is
//! selected once per frame. Every access goes through one critical section;
//! nothing inside it does more than touch memory.
//!
//! Two layers are drawn: the base animation loops forever, and an overlay,
//! while it plays, is drawn instead of it. An overlay that has stopped is
//! dropped at the start of the next frame and the base shows again. With
//! neither layer selected the strip is blank.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant, block_for};
use heapless::{String, Vec};

use crate::animation::{Animation, AnimationState, INFINITE};
use crate::color::Rgb;
use crate::error::{Error, Resource};

/// Longest animation name, in bytes
pub const NAME_LEN: usize = 16;

/// How often [`AnimationRegistry::wait_for_overlay_complete`] looks at the overlay
pub const OVERLAY_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub type AnimationName = String<NAME_LEN>;

struct Entry {
    name: AnimationName,
    animation: Animation,
}

struct Layers<const N: usize> {
    entries: Vec<Entry, N>,
    base: Option<usize>,
    overlay: Option<usize>,
    blank: Animation,
}

impl<const N: usize> Layers<N> {
    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name.as_str() == name)
    }

    /// Index of the animation that draws the next frame
    fn current(&self) -> Option<usize> {
        self.overlay
            .filter(|&index| self.entries[index].animation.state() != AnimationState::Stopped)
            .or(self.base)
    }

    fn current_mut(&mut self) -> &mut Animation {
        match self.current() {
            Some(index) => &mut self.entries[index].animation,
            None => &mut self.blank,
        }
    }
}

/// Lock-guarded animation registry with a base and an overlay layer
///
/// Meant to live in a `static` shared by both contexts:
///
/// ```ignore
/// static ANIMATIONS: AnimationRegistry<8> = AnimationRegistry::new();
/// ```
pub struct AnimationRegistry<const N: usize> {
    layers: Mutex<RefCell<Layers<N>>>,
}

impl<const N: usize> AnimationRegistry<N> {
    pub const fn new() -> Self {
        Self {
            layers: Mutex::new(RefCell::new(Layers {
                entries: Vec::new(),
                base: None,
                overlay: None,
                blank: Animation::blank(),
            })),
        }
    }

    fn lock<R>(&self, f: impl FnOnce(&mut Layers<N>) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.layers.borrow(cs).borrow_mut()))
    }

    /// Add an animation, or replace the one already registered under `name`
    ///
    /// Fails when the registry is full or the name is longer than
    /// [`NAME_LEN`] bytes.
    pub fn register(&self, name: &str, animation: Animation) -> Result<(), Error> {
        let Ok(key) = AnimationName::try_from(name) else {
            warn!("animation name too long: {}", name);
            return Err(Error::ResourceExhausted(Resource::RegistrySlot));
        };
        self.lock(|layers| {
            if let Some(index) = layers.position(name) {
                layers.entries[index].animation = animation;
                return Ok(());
            }
            layers
                .entries
                .push(Entry {
                    name: key,
                    animation,
                })
                .map_err(|_| {
                    warn!("animation registry full, dropped {}", name);
                    Error::ResourceExhausted(Resource::RegistrySlot)
                })
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock(|layers| layers.position(name).is_some())
    }

    pub fn len(&self) -> usize {
        self.lock(|layers| layers.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make `name` the base layer and play it forever
    ///
    /// Returns `false`, changing nothing, if `name` is not registered.
    pub fn set_base_animation(&self, name: &str) -> bool {
        self.lock(|layers| {
            let Some(index) = layers.position(name) else {
                warn!("unknown base animation {}", name);
                return false;
            };
            layers.entries[index].animation.play(INFINITE);
            layers.base = Some(index);
            true
        })
    }

    /// Play `name` on the overlay layer for `loops` loops
    ///
    /// Replaces an overlay that is still playing. Returns `false`, changing
    /// nothing, if `name` is not registered.
    pub fn play_overlay(&self, name: &str, loops: i32) -> bool {
        self.lock(|layers| {
            let Some(index) = layers.position(name) else {
                warn!("unknown overlay animation {}", name);
                return false;
            };
            layers.entries[index].animation.play(loops);
            layers.overlay = Some(index);
            true
        })
    }

    /// Stop the overlay; the base shows again from the next frame
    pub fn stop_overlay(&self) {
        self.lock(|layers| {
            if let Some(index) = layers.overlay {
                layers.entries[index].animation.stop();
            }
        });
    }

    /// Forward `value` to the animation that draws the next frame
    pub fn set_parameter(&self, value: f32) {
        self.lock(|layers| layers.current_mut().parameter(value));
    }

    /// Forward `value` to the animation registered under `name`
    pub fn set_parameter_for(&self, name: &str, value: f32) -> bool {
        self.lock(|layers| match layers.position(name) {
            Some(index) => {
                layers.entries[index].animation.parameter(value);
                true
            }
            None => false,
        })
    }

    /// Whether an overlay is selected
    pub fn has_overlay(&self) -> bool {
        self.lock(|layers| layers.overlay.is_some())
    }

    /// Block until the overlay layer is empty
    ///
    /// Polls every [`OVERLAY_POLL_INTERVAL`]. Returns `false` if `timeout`
    /// elapses first; `None` waits as long as it takes.
    pub fn wait_for_overlay_complete(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        loop {
            if !self.has_overlay() {
                return true;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return false;
            }
            block_for(OVERLAY_POLL_INTERVAL);
        }
    }

    /// Name of the animation that draws the next frame, `None` when blank
    pub fn current_animation(&self) -> Option<AnimationName> {
        self.lock(|layers| {
            layers
                .current()
                .map(|index| layers.entries[index].name.clone())
        })
    }

    pub fn base_animation(&self) -> Option<AnimationName> {
        self.lock(|layers| layers.base.map(|index| layers.entries[index].name.clone()))
    }

    pub fn overlay_animation(&self) -> Option<AnimationName> {
        self.lock(|layers| {
            layers
                .overlay
                .map(|index| layers.entries[index].name.clone())
        })
    }

    /// State of the animation registered under `name`
    pub fn state_of(&self, name: &str) -> Option<AnimationState> {
        self.inspect(name, Animation::state)
    }

    /// Copy of the animation registered under `name`
    pub fn snapshot(&self, name: &str) -> Result<Animation, Error> {
        self.inspect(name, Animation::clone)
            .ok_or(Error::UnknownName)
    }

    /// Look at the animation registered under `name`
    pub fn inspect<R>(&self, name: &str, f: impl FnOnce(&Animation) -> R) -> Option<R> {
        self.lock(|layers| {
            layers
                .position(name)
                .map(|index| f(&layers.entries[index].animation))
        })
    }

    /// Render side: draw the next frame of the selected animation
    ///
    /// Drops an overlay that stopped since the last frame before resolving
    /// which animation draws.
    pub fn advance(&self, leds: &mut [Rgb], delta_secs: f32) {
        self.lock(|layers| {
            if let Some(index) = layers.overlay {
                if layers.entries[index].animation.state() == AnimationState::Stopped {
                    layers.overlay = None;
                    debug!("overlay {} finished", layers.entries[index].name.as_str());
                }
            }
            layers.current_mut().update(leds, delta_secs);
        });
    }
}

impl<const N: usize> Default for AnimationRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}
