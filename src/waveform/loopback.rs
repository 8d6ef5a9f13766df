//! In-memory waveform peripheral
//!
//! Stands in for the hardware on the host: instruction writes land in an
//! array, words pushed to a lane are captured so they can be inspected, and
//! lanes whose receive queue is not joined onto transmit echo every pushed
//! word back. A lane can be stalled to make its transmit queue look full.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{Deque, Vec};

use super::{INSTRUCTION_MEMORY_SIZE, LANE_COUNT, Lane, LaneConfig, WaveformPeripheral};

struct LaneState<const CAPACITY: usize> {
    config: Option<LaneConfig>,
    enabled: bool,
    stalled: bool,
    restarts: u32,
    transmitted: Deque<u32, CAPACITY>,
    echoed: Deque<u32, CAPACITY>,
}

impl<const CAPACITY: usize> LaneState<CAPACITY> {
    const fn new() -> Self {
        Self {
            config: None,
            enabled: false,
            stalled: false,
            restarts: 0,
            transmitted: Deque::new(),
            echoed: Deque::new(),
        }
    }
}

struct Memory<const CAPACITY: usize> {
    instructions: [u16; INSTRUCTION_MEMORY_SIZE],
    lanes: [LaneState<CAPACITY>; LANE_COUNT],
}

/// Loopback peripheral keeping the most recent `CAPACITY` words per lane
pub struct LoopbackPeripheral<const CAPACITY: usize> {
    memory: Mutex<RefCell<Memory<CAPACITY>>>,
}

/// Push to a bounded queue, evicting the oldest entry when full
fn push_evicting<const CAPACITY: usize>(queue: &mut Deque<u32, CAPACITY>, word: u32) {
    if queue.is_full() {
        queue.pop_front();
    }
    let _ = queue.push_back(word);
}

impl<const CAPACITY: usize> LoopbackPeripheral<CAPACITY> {
    pub const fn new() -> Self {
        Self {
            memory: Mutex::new(RefCell::new(Memory {
                instructions: [0; INSTRUCTION_MEMORY_SIZE],
                lanes: [const { LaneState::new() }; LANE_COUNT],
            })),
        }
    }

    fn with_lane<R>(&self, lane: Lane, f: impl FnOnce(&mut LaneState<CAPACITY>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.memory.borrow(cs).borrow_mut().lanes[lane.index()]))
    }

    /// Instruction word stored at `address`
    pub fn instruction(&self, address: u8) -> u16 {
        critical_section::with(|cs| {
            self.memory.borrow(cs).borrow().instructions[usize::from(address) % INSTRUCTION_MEMORY_SIZE]
        })
    }

    /// Configuration last applied to `lane`
    pub fn lane_config(&self, lane: Lane) -> Option<LaneConfig> {
        self.with_lane(lane, |state| state.config)
    }

    pub fn is_enabled(&self, lane: Lane) -> bool {
        self.with_lane(lane, |state| state.enabled)
    }

    /// How many times `lane` was restarted
    pub fn restart_count(&self, lane: Lane) -> u32 {
        self.with_lane(lane, |state| state.restarts)
    }

    /// Make `lane`'s transmit queue report full until unstalled
    pub fn set_stalled(&self, lane: Lane, stalled: bool) {
        self.with_lane(lane, |state| state.stalled = stalled);
    }

    /// Drain the words captured on `lane`, oldest first
    pub fn take_transmitted(&self, lane: Lane) -> Vec<u32, CAPACITY> {
        self.with_lane(lane, |state| {
            let mut words = Vec::new();
            while let Some(word) = state.transmitted.pop_front() {
                let _ = words.push(word);
            }
            words
        })
    }
}

impl<const CAPACITY: usize> Default for LoopbackPeripheral<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAPACITY: usize> WaveformPeripheral for LoopbackPeripheral<CAPACITY> {
    fn write_instruction(&self, address: u8, instruction: u16) {
        critical_section::with(|cs| {
            self.memory.borrow(cs).borrow_mut().instructions[usize::from(address) % INSTRUCTION_MEMORY_SIZE] =
                instruction;
        });
    }

    fn configure(&self, lane: Lane, config: &LaneConfig) {
        self.with_lane(lane, |state| {
            state.config = Some(*config);
            state.enabled = false;
        });
    }

    fn set_enabled(&self, lane: Lane, enabled: bool) {
        self.with_lane(lane, |state| state.enabled = enabled);
    }

    fn clear_fifos(&self, lane: Lane) {
        self.with_lane(lane, |state| {
            state.transmitted.clear();
            state.echoed.clear();
        });
    }

    fn restart(&self, lane: Lane) {
        self.with_lane(lane, |state| state.restarts += 1);
    }

    fn is_tx_full(&self, lane: Lane) -> bool {
        self.with_lane(lane, |state| state.stalled)
    }

    fn push(&self, lane: Lane, word: u32) {
        self.with_lane(lane, |state| {
            push_evicting(&mut state.transmitted, word);
            if state.config.is_some_and(|config| !config.join_tx) {
                push_evicting(&mut state.echoed, word);
            }
        });
    }

    fn is_rx_empty(&self, lane: Lane) -> bool {
        self.with_lane(lane, |state| state.echoed.is_empty())
    }

    fn pull(&self, lane: Lane) -> u32 {
        self.with_lane(lane, |state| state.echoed.pop_front().unwrap_or(0))
    }
}
