#![forbid(unsafe_code)]

//! Logging for the effect state machines.
//!
//! Effect code logs through `crate::debug!` and `crate::trace!`. With the
//! `tracing` feature these are the `tracing` macros; without it they expand
//! to nothing, so call sites need no `cfg`.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Milestones: animation started, interrupted.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Per-step detail: settle, re-arm, swap direction.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }
}
