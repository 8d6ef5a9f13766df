use embassy_time::Instant;
use heapless::Vec;

use crate::color::Rgb;
use crate::encoder::{StripConfig, StripEncoder};
use crate::error::Error;
use crate::registry::AnimationRegistry;
use crate::rendezvous::Rendezvous;
use crate::waveform::{WaveformBlock, WaveformPeripheral};

/// Render-side half of the engine
///
/// Owns the strip encoder and the frame buffer. Each [`tick`](Self::tick)
/// advances the selected animation of the shared registry by the real time
/// since the previous tick and sends the frame to the strip.
pub struct Animator<'a, P: WaveformPeripheral, const N: usize, const MAX_LEDS: usize> {
    registry: &'a AnimationRegistry<N>,
    encoder: StripEncoder<'a, P, MAX_LEDS>,
    frame: Vec<Rgb, MAX_LEDS>,
    last_tick: Option<Instant>,
}

#[allow(clippy::cast_precision_loss)]
fn elapsed_secs(since: Instant, now: Instant) -> f32 {
    now.checked_duration_since(since)
        .map_or(0.0, |elapsed| elapsed.as_micros() as f32 / 1_000_000.0)
}

impl<'a, P: WaveformPeripheral, const N: usize, const MAX_LEDS: usize> Animator<'a, P, N, MAX_LEDS> {
    /// Set up the strip output on `block` and render from `registry`
    pub fn new(
        registry: &'a AnimationRegistry<N>,
        block: &'a WaveformBlock<P>,
        rendezvous: &'a Rendezvous,
        config: &StripConfig,
    ) -> Result<Self, Error> {
        let encoder = StripEncoder::new(block, rendezvous, config)?;
        Ok(Self::with_encoder(registry, encoder, config.led_count))
    }

    /// Render from `registry` through an existing encoder
    pub fn with_encoder(
        registry: &'a AnimationRegistry<N>,
        encoder: StripEncoder<'a, P, MAX_LEDS>,
        led_count: usize,
    ) -> Self {
        let mut frame = Vec::new();
        let _ = frame.resize(led_count.min(MAX_LEDS), Rgb::default());
        Self {
            registry,
            encoder,
            frame,
            last_tick: None,
        }
    }

    /// Produce and send one frame
    ///
    /// The first tick advances animations by zero. A transmission that
    /// times out resets the lane and is reported; the next tick sends a
    /// fresh frame.
    pub fn tick(&mut self, now: Instant) -> Result<(), Error> {
        let delta_secs = self.last_tick.map_or(0.0, |last| elapsed_secs(last, now));
        self.last_tick = Some(now);

        self.registry.advance(&mut self.frame, delta_secs);

        let result = self.encoder.render(&self.frame);
        if let Err(Error::Timeout) = result {
            warn!("frame transmission timed out, resetting lane");
            self.encoder.reset();
        }
        result
    }

    /// Change the number of pixels drawn, up to `MAX_LEDS`
    pub fn set_led_count(&mut self, led_count: usize) {
        let _ = self.frame.resize(led_count.min(MAX_LEDS), Rgb::default());
    }

    /// Last frame the animations produced, before calibration
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    pub const fn registry(&self) -> &'a AnimationRegistry<N> {
        self.registry
    }

    pub fn encoder(&self) -> &StripEncoder<'a, P, MAX_LEDS> {
        &self.encoder
    }

    pub fn encoder_mut(&mut self) -> &mut StripEncoder<'a, P, MAX_LEDS> {
        &mut self.encoder
    }
}
