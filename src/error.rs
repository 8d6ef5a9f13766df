use core::fmt;

/// A finite resource that can run out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Instruction memory of a waveform block
    InstructionMemory,
    /// Hardware lane (state machine) of a waveform block
    Lane,
    /// Shared-program slot of a waveform block
    ProgramSlot,
    /// Slot in the animation registry
    RegistrySlot,
}

/// Errors reported by the strip engine
///
/// Unknown animation names in control commands are not errors: those calls
/// report `false` and leave the current selection alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A resource was exhausted. At startup this means a wiring or
    /// configuration mistake, not a transient condition.
    ResourceExhausted(Resource),
    /// A push or pull on a lane queue did not complete in time.
    ///
    /// Recoverable: retry, or [`reset`](crate::WaveformChannel::reset) the lane.
    Timeout,
    /// An animation name is not registered
    UnknownName,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InstructionMemory => "instruction memory",
            Self::Lane => "hardware lane",
            Self::ProgramSlot => "program slot",
            Self::RegistrySlot => "animation registry slot",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceExhausted(resource) => write!(f, "no free {resource}"),
            Self::Timeout => f.write_str("peripheral queue timed out"),
            Self::UnknownName => f.write_str("unknown animation name"),
        }
    }
}

impl core::error::Error for Error {}
