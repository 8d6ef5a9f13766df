//! WS2812 strip output
//!
//! [`StripEncoder`] calibrates a logical frame and streams it to a strip
//! through one waveform lane running [`WS2812_PROGRAM`]. Every word carries a
//! command byte in its top byte: `0x00` is followed by one pixel in
//! `G R B` order, `0xFF` latches the frame.

use embassy_time::Duration;
use heapless::Vec;

use crate::color::Rgb;
use crate::error::Error;
use crate::filter::{Calibration, CalibrationPipeline, ColorBalance};
use crate::rendezvous::Rendezvous;
use crate::waveform::{
    ClockDivider, LaneConfig, ProgramImage, ShiftDirection, WaveformBlock, WaveformChannel,
    WaveformPeripheral, WaveformProgram,
};

/// Lane clock divider for a 125 MHz system clock: 8 MHz, 10 cycles per bit
pub const DEFAULT_CLOCK_DIVIDER: f32 = 15.625;

/// Word that ends a frame and holds the line low for the latch
pub const LATCH_WORD: u32 = 0xFF << 24;

/// WS2812 driver with a latch command
///
/// ```text
///     .side_set 1
///     .wrap_target
/// 0:  out x, 8                ; command byte
/// 1:  jmp !x, 6               ; 0x00: pixel
/// 2:  out null, 24            ; latch
/// 3:  set y, 31
/// 4:  jmp y--, 4      [15]    ; 512 cycles low
/// 5:  jmp 0
/// 6:  set y, 23
/// 7:  out x, 1        [2]
/// 8:  jmp !x, 10  side 1 [1]
/// 9:  jmp 11      side 1 [3]  ; one: long high
/// 10: nop                [3]  ; zero: long low
/// 11: jmp y--, 7
///     .wrap
/// ```
pub const WS2812_PROGRAM: ProgramImage = ProgramImage {
    instructions: &[
        0x6028, 0x0026, 0x6078, 0xE05F, 0x0F84, 0x0000, 0xE057, 0x6221, 0x112A, 0x130B, 0xA342,
        0x0087,
    ],
    origin: None,
    wrap_target: 0,
    wrap: 11,
    side_set_bits: 1,
};

/// Lane configuration for [`WS2812_PROGRAM`] loaded at `offset`
pub fn ws2812_lane_config(offset: u8, image: &ProgramImage, pin: u8, clock_divider: f32) -> LaneConfig {
    LaneConfig {
        pin,
        clock_divider: ClockDivider::from_f32(clock_divider),
        origin: offset,
        wrap_target: offset + image.wrap_target,
        wrap: offset + image.wrap,
        side_set_bits: image.side_set_bits,
        out_shift: ShiftDirection::Left,
        autopull: Some(32),
        join_tx: true,
    }
}

/// Pack a pixel into its wire word
#[inline]
pub fn pixel_word(color: Rgb) -> u32 {
    u32::from(color.g) << 16 | u32::from(color.r) << 8 | u32::from(color.b)
}

/// Strip output settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripConfig {
    /// Data pin
    pub pin: u8,
    /// Number of pixels on the strip
    pub led_count: usize,
    pub clock_divider: f32,
    pub calibration: Calibration,
    /// Bound on waiting for queue space per word, `None` blocks
    pub word_timeout: Option<Duration>,
}

impl StripConfig {
    pub const fn new(pin: u8, led_count: usize) -> Self {
        Self {
            pin,
            led_count,
            clock_divider: DEFAULT_CLOCK_DIVIDER,
            calibration: Calibration::new(),
            word_timeout: None,
        }
    }
}

/// Calibrates frames and transmits them over one waveform lane
pub struct StripEncoder<'a, P: WaveformPeripheral, const MAX_LEDS: usize> {
    channel: WaveformChannel<'a, P>,
    rendezvous: &'a Rendezvous,
    pipeline: CalibrationPipeline,
    staged: Vec<Rgb, MAX_LEDS>,
    word_timeout: Option<Duration>,
}

impl<'a, P: WaveformPeripheral, const MAX_LEDS: usize> StripEncoder<'a, P, MAX_LEDS> {
    /// Load the strip program on `block` (or share the loaded copy) and
    /// claim a lane for it
    pub fn new(
        block: &'a WaveformBlock<P>,
        rendezvous: &'a Rendezvous,
        config: &StripConfig,
    ) -> Result<Self, Error> {
        let program = WaveformProgram::load(block, &WS2812_PROGRAM)?;
        let channel = WaveformChannel::claim(
            program,
            ws2812_lane_config,
            config.pin,
            config.clock_divider,
        )?;

        let mut staged = Vec::new();
        let _ = staged.resize(config.led_count.min(MAX_LEDS), Rgb::default());

        Ok(Self {
            channel,
            rendezvous,
            pipeline: CalibrationPipeline::new(&config.calibration),
            staged,
            word_timeout: config.word_timeout,
        })
    }

    /// Calibrate `frame` and send it, followed by the latch word
    ///
    /// The staging buffer follows the frame's length, up to `MAX_LEDS`.
    pub fn render(&mut self, frame: &[Rgb]) -> Result<(), Error> {
        let len = frame.len().min(MAX_LEDS);
        if len < frame.len() {
            warn!("frame of {} pixels truncated to {}", frame.len(), MAX_LEDS);
        }
        self.staged.clear();
        // Cannot fail, `len` is within capacity
        let _ = self.staged.extend_from_slice(&frame[..len]);
        self.pipeline.apply(&mut self.staged);

        let channel = &mut self.channel;
        let staged = &self.staged;
        let timeout = self.word_timeout;
        self.rendezvous.transmit(|| {
            for &pixel in staged {
                channel.write(pixel_word(pixel), timeout)?;
            }
            channel.write(LATCH_WORD, timeout)
        })
    }

    /// Restart the lane after a failed transmission
    pub fn reset(&mut self) {
        self.channel.reset();
    }

    /// Last calibrated frame
    pub fn staged(&self) -> &[Rgb] {
        &self.staged
    }

    pub fn calibration(&self) -> Calibration {
        self.pipeline.calibration()
    }

    pub fn set_color_balance(&mut self, balance: ColorBalance) {
        self.pipeline.set_color_balance(balance);
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.pipeline.set_brightness(brightness);
    }

    pub fn set_gamma(&mut self, gamma: f32) {
        self.pipeline.set_gamma(gamma);
    }

    pub fn channel(&self) -> &WaveformChannel<'a, P> {
        &self.channel
    }

    pub const fn rendezvous(&self) -> &'a Rendezvous {
        self.rendezvous
    }
}
