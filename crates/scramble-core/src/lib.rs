#![forbid(unsafe_code)]

//! Core: clock-free text effects driven by discrete ticks.
//!
//! Everything in this crate is single-threaded and owns its own state. The
//! caller decides when a tick happens, either by calling `step()` once per
//! timer callback or by feeding frame deltas through [`animation::Animation::tick`].
//! Timer ownership lives in `scramble-runtime`.

pub mod animation;
pub mod charset;
pub mod config;
pub mod letter_swap;
pub mod link;
pub mod logging;
pub mod scramble;

pub use charset::CharacterSet;
pub use config::{ConfigError, ScrambleConfig};
pub use letter_swap::{LetterFrame, LetterSwap, LetterSwapConfig, SlideDirection, SwapMode};
pub use link::ScrambleLink;
pub use scramble::{ScrambleEvent, ScrambleState, ScrambleTransition, TickOutcome};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace};
