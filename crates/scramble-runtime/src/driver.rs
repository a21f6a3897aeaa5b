#![forbid(unsafe_code)]

//! Timer-driven owner of one scramble transition.
//!
//! # Lifecycle
//!
//! 1. [`ScrambleDriver::set_target`] retargets the transition. If ticks are
//!    needed, the previous timer is cancelled (stopped and joined) before a
//!    new one is spawned under a fresh [`Generation`].
//! 2. [`ScrambleDriver::pump`] (or one of the blocking variants) applies
//!    queued ticks on the caller's thread, one transition step per tick.
//! 3. The settling tick cancels the timer.
//! 4. [`ScrambleDriver::dispose`] or dropping the driver cancels whatever is
//!    still running.
//!
//! # Invariants
//!
//! 1. At most one live timer per driver.
//! 2. Ticks from a superseded timer are discarded, never applied.
//! 3. Setting the same target while settled spawns nothing. While animating
//!    without a timer (after `dispose`), it resumes on a new one.
//! 4. No timer outlives its driver.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use rand::Rng;
use scramble_core::scramble::{ScrambleEvent, ScrambleTransition, TickOutcome};
use scramble_core::ScrambleConfig;

use crate::timer::{Generation, Interval, Tick, TickSource, TimerHandle};

type SourceFactory = Box<dyn Fn(Duration) -> Box<dyn TickSource>>;

/// One scramble transition plus the timer that drives it.
pub struct ScrambleDriver<R> {
    transition: ScrambleTransition<R>,
    timer: Option<TimerHandle>,
    generation: Generation,
    make_source: SourceFactory,
    sender: mpsc::Sender<Tick>,
    receiver: mpsc::Receiver<Tick>,
    stale_ticks: u64,
}

impl<R: Rng> ScrambleDriver<R> {
    /// Create a settled driver showing `initial`, ticking on a real interval.
    pub fn new(initial: impl Into<String>, config: ScrambleConfig, rng: R) -> Self {
        Self::with_tick_source(initial, config, rng, |period| {
            Box::new(Interval::new(period))
        })
    }

    /// Like [`new`](Self::new), but timers come from `make_source`, which
    /// receives the configured tick interval.
    pub fn with_tick_source(
        initial: impl Into<String>,
        config: ScrambleConfig,
        rng: R,
        make_source: impl Fn(Duration) -> Box<dyn TickSource> + 'static,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            transition: ScrambleTransition::new(initial, config, rng),
            timer: None,
            generation: 0,
            make_source: Box::new(make_source),
            sender,
            receiver,
            stale_ticks: 0,
        }
    }

    /// Request a new target. Returns `false` if it was already the target
    /// and its animation has a live timer.
    ///
    /// The same target after [`dispose`](Self::dispose) resumes the
    /// interrupted animation on a fresh timer.
    pub fn set_target(&mut self, target: &str) -> bool {
        if self.transition.set_target(target) {
            self.rearm();
            return true;
        }
        if self.transition.needs_timer() && self.timer.is_none() {
            tracing::debug!(target_len = target.len(), "resuming stalled scramble");
            self.rearm();
            return true;
        }
        false
    }

    /// Scramble into the current target again.
    pub fn rescramble(&mut self) -> bool {
        self.transition.restart();
        self.rearm();
        self.transition.is_animating()
    }

    fn rearm(&mut self) {
        self.cancel_timer();
        if self.transition.needs_timer() {
            self.generation += 1;
            let source = (self.make_source)(self.transition.config().tick_interval());
            self.timer = Some(TimerHandle::spawn(
                source,
                self.generation,
                self.sender.clone(),
            ));
        }
    }

    /// Apply every queued tick without blocking. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(tick) = self.receiver.try_recv() {
            if self.apply(tick) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until at least one live tick is applied or `timeout` passes,
    /// then apply anything else already queued.
    ///
    /// A timeout too large to represent as an [`Instant`] (such as
    /// `Duration::MAX`) waits without a deadline.
    pub fn pump_blocking(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now().checked_add(timeout);
        let mut applied = self.pump();
        while applied == 0 && self.timer.is_some() {
            let received = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    self.receiver.recv_timeout(deadline - now)
                }
                None => self.receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(tick) => {
                    if self.apply(tick) {
                        applied += 1;
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        applied + self.pump()
    }

    /// Apply ticks until the transition settles. Returns `false` on timeout
    /// or when no timer is driving the transition.
    pub fn wait_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            self.pump();
            if !self.transition.is_animating() {
                return true;
            }
            if self.timer.is_none() {
                return false;
            }
            let remaining = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    deadline - now
                }
                None => Duration::MAX,
            };
            self.pump_blocking(remaining);
        }
    }

    fn apply(&mut self, tick: Tick) -> bool {
        if self.timer.is_none() || tick.generation != self.generation {
            self.stale_ticks += 1;
            tracing::trace!(
                tick_generation = tick.generation,
                current = self.generation,
                "dropping stale tick"
            );
            return false;
        }
        if self.transition.step() == TickOutcome::Settled {
            tracing::debug!(
                generation = self.generation,
                ticks = tick.sequence,
                "scramble settled"
            );
            self.cancel_timer();
        }
        true
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Cancel the timer and drop queued ticks. The display stays as is.
    ///
    /// Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.cancel_timer();
        while self.receiver.try_recv().is_ok() {
            self.stale_ticks += 1;
        }
    }
}

impl<R> ScrambleDriver<R> {
    pub fn display_text(&self) -> &str {
        self.transition.display_text()
    }

    pub fn target(&self) -> &str {
        self.transition.target()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_animating()
    }

    pub fn has_active_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Generation of the most recently spawned timer (0 before any).
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Ticks discarded because their timer had been replaced or cancelled.
    pub fn stale_ticks(&self) -> u64 {
        self.stale_ticks
    }

    pub fn transition(&self) -> &ScrambleTransition<R> {
        &self.transition
    }

    pub fn drain_events(&mut self) -> Vec<ScrambleEvent> {
        self.transition.drain_events()
    }
}

impl<R> Drop for ScrambleDriver<R> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl<R> fmt::Debug for ScrambleDriver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrambleDriver")
            .field("display", &self.transition.display_text())
            .field("target", &self.transition.target())
            .field("generation", &self.generation)
            .field("timer", &self.timer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::MockTicks;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use scramble_core::CharacterSet;
    use std::thread;

    const WAIT: Duration = Duration::from_secs(5);

    fn config() -> ScrambleConfig {
        ScrambleConfig::default()
            .with_duration(Duration::from_millis(300))
            .with_tick_interval(Duration::from_millis(100))
            .unwrap()
            .with_character_set(CharacterSet::new("#").unwrap())
    }

    fn mock_driver(initial: &str, ticks: u64) -> ScrambleDriver<StdRng> {
        ScrambleDriver::with_tick_source(initial, config(), StdRng::seed_from_u64(1), move |_| {
            Box::new(MockTicks::new(ticks))
        })
    }

    #[test]
    fn new_driver_is_settled_without_timer() {
        let d = mock_driver("HELLO", 10);
        assert_eq!(d.display_text(), "HELLO");
        assert!(!d.has_active_timer());
        assert_eq!(d.generation(), 0);
    }

    #[test]
    fn same_target_spawns_nothing() {
        let mut d = mock_driver("HELLO", 10);
        assert!(!d.set_target("HELLO"));
        assert!(!d.has_active_timer());
        assert_eq!(d.generation(), 0);
    }

    #[test]
    fn empty_target_spawns_nothing() {
        let mut d = mock_driver("HELLO", 10);
        assert!(d.set_target(""));
        assert_eq!(d.display_text(), "");
        assert!(!d.has_active_timer());
    }

    #[test]
    fn ticks_drive_to_settle_and_cancel_timer() {
        let mut d = mock_driver("", 10);
        d.set_target("CAT");
        assert!(d.has_active_timer());
        assert!(d.wait_settled(WAIT));
        assert_eq!(d.display_text(), "CAT");
        assert!(!d.has_active_timer());
        // Extra mock ticks queued after settle are discarded.
        thread::sleep(Duration::from_millis(20));
        assert_eq!(d.pump(), 0);
    }

    #[test]
    fn retarget_discards_stale_ticks() {
        let mut d = mock_driver("", 2);
        d.set_target("HELLO");
        thread::sleep(Duration::from_millis(30));
        // Two ticks of generation 1 are queued but not applied.
        d.set_target("WORLD");
        assert_eq!(d.generation(), 2);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(d.pump(), 2);
        assert_eq!(d.stale_ticks(), 2);
        assert_eq!(d.transition().current_step(), 2);
    }

    #[test]
    fn dispose_cancels_and_is_idempotent() {
        let mut d = mock_driver("", 0);
        d.set_target("HELLO");
        assert!(d.has_active_timer());
        d.dispose();
        assert!(!d.has_active_timer());
        d.dispose();
        assert!(d.is_animating(), "dispose leaves the display untouched");
    }

    #[test]
    fn same_target_after_dispose_resumes() {
        let mut d = mock_driver("", 10);
        d.set_target("CAT");
        d.dispose();
        assert!(d.is_animating());
        assert!(!d.has_active_timer());
        assert!(!d.wait_settled(Duration::from_millis(20)));

        assert!(d.set_target("CAT"));
        assert!(d.has_active_timer());
        assert_eq!(d.generation(), 2);
        assert!(d.wait_settled(WAIT));
        assert_eq!(d.display_text(), "CAT");
        assert!(!d.set_target("CAT"));
    }

    #[test]
    fn unbounded_timeouts_do_not_overflow() {
        let mut d = mock_driver("", 10);
        d.set_target("DOG");
        assert!(d.pump_blocking(Duration::MAX) > 0);
        assert!(d.wait_settled(Duration::MAX));
        assert_eq!(d.display_text(), "DOG");
        // Nothing left to wait for: returns at once.
        assert_eq!(d.pump_blocking(Duration::MAX), 0);
    }

    #[test]
    fn rescramble_restarts_timer() {
        let mut d = mock_driver("LINK", 10);
        assert!(d.rescramble());
        assert!(d.has_active_timer());
        assert!(d.wait_settled(WAIT));
        assert_eq!(d.display_text(), "LINK");
    }

    #[test]
    fn wait_settled_times_out_when_ticks_stop() {
        let mut d = mock_driver("", 1);
        d.set_target("LONGER");
        assert!(!d.wait_settled(Duration::from_millis(50)));
        assert!(d.is_animating());
    }

    #[test]
    fn debug_format() {
        let d = mock_driver("HI", 0);
        let dbg = format!("{d:?}");
        assert!(dbg.contains("ScrambleDriver"));
        assert!(dbg.contains("HI"));
    }
}
