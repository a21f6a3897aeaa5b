#![forbid(unsafe_code)]

//! Runtime: owns the timers that drive scramble transitions.
//!
//! The state machines in `scramble-core` never sleep. A [`ScrambleDriver`]
//! pairs one transition with at most one background ticker and applies the
//! ticks on the owner's thread.

pub mod driver;
pub mod timer;

pub use driver::ScrambleDriver;
pub use timer::{Generation, Interval, MockTicks, StopSignal, Tick, TickSource, TimerHandle};
