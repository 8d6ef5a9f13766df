#![no_std]

// Must come first so the logging macros are visible to the modules below
mod fmt;

pub mod animation;
pub mod animator;
pub mod color;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod frame_scheduler;
pub mod presets;
pub mod registry;
pub mod rendezvous;
pub mod waveform;

pub use animation::{Animation, AnimationKind, AnimationState, INFINITE, Pattern, Playback};
pub use animator::Animator;
pub use color::{HsvColor, Rgb};
pub use encoder::{DEFAULT_CLOCK_DIVIDER, LATCH_WORD, StripConfig, StripEncoder, WS2812_PROGRAM};
pub use error::{Error, Resource};
pub use filter::{Calibration, ColorBalance, GammaCurve};
pub use frame_scheduler::{FRAME_DURATION, FrameResult, FrameScheduler, TARGET_FPS};
pub use registry::{AnimationName, AnimationRegistry, NAME_LEN, OVERLAY_POLL_INTERVAL};
pub use rendezvous::{PauseToken, Rendezvous};
pub use waveform::{
    Lane, LaneConfig, ProgramImage, WaveformBlock, WaveformChannel, WaveformPeripheral,
    WaveformProgram,
};

pub use embassy_time::{Duration, Instant};
