//! Programmable waveform peripheral
//!
//! A waveform block has a small shared instruction memory and a handful of
//! lanes (state machines) that execute programs out of it. Programs are
//! loaded once per block and shared by every lane that runs them; lanes are
//! claimed exclusively for the lifetime of a [`WaveformChannel`].
//!
//! The register level is abstracted by [`WaveformPeripheral`]; allocation of
//! instruction memory and lanes is tracked by [`WaveformBlock`].

mod block;
mod channel;
pub mod loopback;
mod program;

pub use block::WaveformBlock;
pub use channel::{LaneConfigurator, WaveformChannel};
pub use program::{ProgramImage, WaveformProgram};

/// Instruction slots in one block
pub const INSTRUCTION_MEMORY_SIZE: usize = 32;

/// Lanes in one block
pub const LANE_COUNT: usize = 4;

/// Distinct programs a block keeps track of at once
pub const MAX_PROGRAMS: usize = 8;

/// Index of a lane inside its block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane(u8);

impl Lane {
    /// Lane by index, if the block has one
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < LANE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fixed point clock divider (16.8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockDivider {
    pub integer: u16,
    pub fraction: u8,
}

impl ClockDivider {
    /// Convert a fractional divider, clamped to the supported `1.0..65536.0`
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn from_f32(divider: f32) -> Self {
        let divider = divider.clamp(1.0, 65_535.996);
        let integer = divider as u16;
        let fraction = ((divider - f32::from(integer)) * 256.0) as u8;
        Self { integer, fraction }
    }

    pub fn as_f32(self) -> f32 {
        f32::from(self.integer) + f32::from(self.fraction) / 256.0
    }
}

/// Direction bits leave the output shift register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Most significant bit first
    Left,
    /// Least significant bit first
    Right,
}

/// Lane configuration applied when a lane is claimed or reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneConfig {
    /// Output pin, also the side-set base
    pub pin: u8,
    pub clock_divider: ClockDivider,
    /// Absolute address the lane starts executing at
    pub origin: u8,
    /// Absolute wrap bounds
    pub wrap_target: u8,
    pub wrap: u8,
    /// Number of side-set pins
    pub side_set_bits: u8,
    pub out_shift: ShiftDirection,
    /// Autopull threshold in bits, `None` disables autopull
    pub autopull: Option<u8>,
    /// Join the receive queue onto the transmit queue
    pub join_tx: bool,
}

/// Register-level access to one waveform block
///
/// All methods take `&self`: lanes of one block are driven independently and
/// implementations are expected to touch only the registers of the lane
/// they are given.
pub trait WaveformPeripheral {
    /// Store one instruction word
    fn write_instruction(&self, address: u8, instruction: u16);

    /// Apply `config` and move the lane's program counter to its origin.
    /// The lane is left disabled.
    fn configure(&self, lane: Lane, config: &LaneConfig);

    fn set_enabled(&self, lane: Lane, enabled: bool);

    /// Drop everything queued in both directions
    fn clear_fifos(&self, lane: Lane);

    /// Reset the lane's internal state (shift registers, counters, delays)
    fn restart(&self, lane: Lane);

    fn is_tx_full(&self, lane: Lane) -> bool;

    /// Queue one word; only called when the transmit queue has room
    fn push(&self, lane: Lane, word: u32);

    fn is_rx_empty(&self, lane: Lane) -> bool;

    /// Take one word; only called when the receive queue has data
    fn pull(&self, lane: Lane) -> u32;
}
