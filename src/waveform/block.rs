use core::cell::RefCell;

use critical_section::Mutex;

use super::{
    INSTRUCTION_MEMORY_SIZE, LANE_COUNT, Lane, MAX_PROGRAMS, ProgramImage, WaveformPeripheral,
};
use crate::error::{Error, Resource};

#[derive(Clone, Copy)]
struct Resident {
    image: &'static ProgramImage,
    offset: u8,
    refs: usize,
}

struct Allocation {
    /// One bit per instruction slot
    used_instructions: u32,
    /// One bit per lane
    claimed_lanes: u8,
    programs: [Option<Resident>; MAX_PROGRAMS],
}

impl Allocation {
    const fn new() -> Self {
        Self {
            used_instructions: 0,
            claimed_lanes: 0,
            programs: [None; MAX_PROGRAMS],
        }
    }

    /// Free load address for `image`, highest address first
    #[allow(clippy::cast_possible_truncation)]
    fn find_offset(&self, image: &ProgramImage) -> Option<u8> {
        if image.is_empty() || image.len() > INSTRUCTION_MEMORY_SIZE {
            return None;
        }
        let fits = |offset: u8| image.footprint(offset) & self.used_instructions == 0;
        match image.origin {
            Some(origin) => {
                let end = usize::from(origin) + image.len();
                (end <= INSTRUCTION_MEMORY_SIZE && fits(origin)).then_some(origin)
            }
            None => (0..=(INSTRUCTION_MEMORY_SIZE - image.len()) as u8)
                .rev()
                .find(|&offset| fits(offset)),
        }
    }
}

/// One waveform block and the bookkeeping for what is loaded and claimed on it
///
/// Meant to live in a `static` so program and lane handles can borrow it for
/// as long as the firmware runs:
///
/// ```ignore
/// static BLOCK: WaveformBlock<MyPeripheral> = WaveformBlock::new(0, MyPeripheral::new());
/// ```
pub struct WaveformBlock<P> {
    id: u8,
    peripheral: P,
    allocation: Mutex<RefCell<Allocation>>,
}

impl<P: WaveformPeripheral> WaveformBlock<P> {
    pub const fn new(id: u8, peripheral: P) -> Self {
        Self {
            id,
            peripheral,
            allocation: Mutex::new(RefCell::new(Allocation::new())),
        }
    }

    pub const fn id(&self) -> u8 {
        self.id
    }

    pub const fn peripheral(&self) -> &P {
        &self.peripheral
    }

    /// Number of instruction slots currently holding a program
    pub fn used_instructions(&self) -> u32 {
        critical_section::with(|cs| {
            self.allocation
                .borrow(cs)
                .borrow()
                .used_instructions
                .count_ones()
        })
    }

    /// Number of lanes currently claimed
    pub fn claimed_lanes(&self) -> u32 {
        critical_section::with(|cs| self.allocation.borrow(cs).borrow().claimed_lanes.count_ones())
    }

    /// Returns `(slot, offset)` of the resident copy of `image`
    pub(crate) fn acquire_program(&self, image: &'static ProgramImage) -> Result<(usize, u8), Error> {
        critical_section::with(|cs| {
            let mut alloc = self.allocation.borrow(cs).borrow_mut();

            let resident = alloc
                .programs
                .iter_mut()
                .enumerate()
                .find_map(|(slot, entry)| match entry {
                    Some(entry) if entry.image == image => Some((slot, entry)),
                    _ => None,
                });
            if let Some((slot, entry)) = resident {
                entry.refs += 1;
                return Ok((slot, entry.offset));
            }

            let slot = alloc
                .programs
                .iter()
                .position(Option::is_none)
                .ok_or(Error::ResourceExhausted(Resource::ProgramSlot))?;
            let offset = alloc
                .find_offset(image)
                .ok_or(Error::ResourceExhausted(Resource::InstructionMemory))?;

            for index in 0..image.len() {
                #[allow(clippy::cast_possible_truncation)]
                let address = offset + index as u8;
                self.peripheral
                    .write_instruction(address, image.relocated(index, offset));
            }
            alloc.used_instructions |= image.footprint(offset);
            alloc.programs[slot] = Some(Resident {
                image,
                offset,
                refs: 1,
            });
            debug!(
                "block {}: loaded {} instructions at {}",
                self.id,
                image.len(),
                offset
            );

            Ok((slot, offset))
        })
    }

    pub(crate) fn retain_program(&self, slot: usize) {
        critical_section::with(|cs| {
            if let Some(entry) = &mut self.allocation.borrow(cs).borrow_mut().programs[slot] {
                entry.refs += 1;
            }
        });
    }

    pub(crate) fn release_program(&self, slot: usize) {
        critical_section::with(|cs| {
            let mut alloc = self.allocation.borrow(cs).borrow_mut();
            let Some(entry) = &mut alloc.programs[slot] else {
                return;
            };
            entry.refs -= 1;
            if entry.refs == 0 {
                let footprint = entry.image.footprint(entry.offset);
                alloc.used_instructions &= !footprint;
                alloc.programs[slot] = None;
                debug!("block {}: unloaded program slot {}", self.id, slot);
            }
        });
    }

    pub(crate) fn program_refs(&self, slot: usize) -> usize {
        critical_section::with(|cs| {
            self.allocation.borrow(cs).borrow().programs[slot].map_or(0, |entry| entry.refs)
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn claim_lane(&self) -> Result<Lane, Error> {
        critical_section::with(|cs| {
            let mut alloc = self.allocation.borrow(cs).borrow_mut();
            let index = (0..LANE_COUNT as u8)
                .find(|index| alloc.claimed_lanes & (1 << index) == 0)
                .ok_or(Error::ResourceExhausted(Resource::Lane))?;
            alloc.claimed_lanes |= 1 << index;
            Ok(Lane(index))
        })
    }

    pub(crate) fn release_lane(&self, lane: Lane) {
        critical_section::with(|cs| {
            self.allocation.borrow(cs).borrow_mut().claimed_lanes &= !(1 << lane.0);
        });
    }
}
