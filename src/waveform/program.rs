use super::{INSTRUCTION_MEMORY_SIZE, WaveformBlock, WaveformPeripheral};
use crate::error::Error;

/// Opcode bits of an instruction word
const OPCODE_MASK: u16 = 0xE000;

/// `JMP` has an all-zero opcode and an absolute target in its low bits
const OPCODE_JMP: u16 = 0x0000;

/// Assembled program as it sits in flash
#[derive(Debug, PartialEq, Eq)]
pub struct ProgramImage {
    /// Instruction words, assembled for load address 0
    pub instructions: &'static [u16],
    /// Required load address, `None` to let the block choose
    pub origin: Option<u8>,
    /// Wrap bounds, relative to the load address
    pub wrap_target: u8,
    pub wrap: u8,
    /// Number of side-set pins the program drives
    pub side_set_bits: u8,
}

impl ProgramImage {
    pub const fn len(&self) -> usize {
        self.instructions.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Bitmask of the instruction slots this image takes at `offset`
    pub(crate) fn footprint(&self, offset: u8) -> u32 {
        let mask = if self.len() >= INSTRUCTION_MEMORY_SIZE {
            u32::MAX
        } else {
            (1u32 << self.len()) - 1
        };
        mask.checked_shl(u32::from(offset)).unwrap_or(0)
    }

    /// Instruction `index` as it must be stored when loaded at `offset`
    pub(crate) fn relocated(&self, index: usize, offset: u8) -> u16 {
        let instruction = self.instructions[index];
        if instruction & OPCODE_MASK == OPCODE_JMP {
            instruction + u16::from(offset)
        } else {
            instruction
        }
    }
}

/// A program resident in a block's instruction memory
///
/// Handles are reference counted: cloning shares the loaded copy, and the
/// instruction memory is released when the last handle is dropped. Loading
/// an image that is already resident on the block returns a handle to the
/// existing copy instead of loading it twice.
pub struct WaveformProgram<'b, P: WaveformPeripheral> {
    block: &'b WaveformBlock<P>,
    slot: usize,
    offset: u8,
    image: &'static ProgramImage,
}

impl<'b, P: WaveformPeripheral> WaveformProgram<'b, P> {
    /// Get a handle to `image` on `block`, loading it if it is not resident
    ///
    /// Fails with [`Error::ResourceExhausted`] when the image is empty, does
    /// not fit in the free instruction memory, or the block tracks too many
    /// programs.
    pub fn load(block: &'b WaveformBlock<P>, image: &'static ProgramImage) -> Result<Self, Error> {
        let (slot, offset) = block.acquire_program(image)?;
        Ok(Self {
            block,
            slot,
            offset,
            image,
        })
    }

    /// Address of the first instruction
    pub const fn offset(&self) -> u8 {
        self.offset
    }

    pub const fn image(&self) -> &'static ProgramImage {
        self.image
    }

    pub const fn block(&self) -> &'b WaveformBlock<P> {
        self.block
    }

    /// Number of live handles to this program, this one included
    pub fn ref_count(&self) -> usize {
        self.block.program_refs(self.slot)
    }
}

impl<P: WaveformPeripheral> Clone for WaveformProgram<'_, P> {
    fn clone(&self) -> Self {
        self.block.retain_program(self.slot);
        Self {
            block: self.block,
            slot: self.slot,
            offset: self.offset,
            image: self.image,
        }
    }
}

impl<P: WaveformPeripheral> Drop for WaveformProgram<'_, P> {
    fn drop(&mut self) {
        self.block.release_program(self.slot);
    }
}
