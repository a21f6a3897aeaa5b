#![forbid(unsafe_code)]

//! Scramble public facade crate.
//!
//! Re-exports the effect state machines from `scramble-core` and the timer
//! driver from `scramble-runtime`, and defines the error type shared by
//! applications built on them.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use scramble_core::animation::stagger::{StaggerMode, shuffled_order, stagger_offsets};
pub use scramble_core::animation::{Animation, Delayed, EasingFn, Fade};
pub use scramble_core::charset::ALPHANUMERIC;
pub use scramble_core::{
    CharacterSet, ConfigError, LetterFrame, LetterSwap, LetterSwapConfig, ScrambleConfig,
    ScrambleEvent, ScrambleLink, ScrambleState, ScrambleTransition, SlideDirection, SwapMode,
    TickOutcome,
};

// --- Runtime re-exports ----------------------------------------------------

pub use scramble_runtime::{
    Generation, Interval, MockTicks, ScrambleDriver, StopSignal, Tick, TickSource, TimerHandle,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for scramble apps.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while rendering.
    Io(std::io::Error),
    /// Rejected configuration.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "configuration error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for scramble apps.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Animation, CharacterSet, Error, LetterSwap, LetterSwapConfig, Result, ScrambleConfig,
        ScrambleDriver, ScrambleLink, ScrambleTransition, TickOutcome,
    };
}
