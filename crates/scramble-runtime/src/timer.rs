#![forbid(unsafe_code)]

//! Cancellable background tickers.
//!
//! A [`TickSource`] runs on its own thread and sends [`Tick`]s through a
//! channel until its [`StopSignal`] fires or the receiver goes away. The
//! owner holds a [`TimerHandle`]; cancelling it (or dropping it) fires the
//! signal.
//!
//! Every tick carries the [`Generation`] of the timer that produced it, so
//! an owner that replaced its timer can discard ticks the old one already
//! queued.

use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Identifies which timer of an owner produced a tick.
pub type Generation = u64;

/// One timer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: Generation,
    /// 1-based count of ticks sent by this timer.
    pub sequence: u64,
}

/// A producer of ticks, run on a background thread.
pub trait TickSource: Send {
    /// Send ticks tagged with `generation` until `stop` fires or the channel
    /// disconnects.
    fn run(&self, generation: Generation, sender: mpsc::Sender<Tick>, stop: StopSignal);
}

// ---------------------------------------------------------------------------
// Stop signal
// ---------------------------------------------------------------------------

/// Stop flag shared between a timer thread and its handle.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    /// Create a new (signal, trigger) pair.
    pub(crate) fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: inner.clone(),
        };
        (signal, StopTrigger { inner })
    }

    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for the stop signal or a timeout.
    ///
    /// Returns `true` if stopped, `false` if the full duration elapsed.
    /// Spurious wakeups resume waiting for the remaining time.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if *stopped {
            return true;
        }

        let start = Instant::now();
        let mut remaining = duration;
        loop {
            let (guard, result) = cvar
                .wait_timeout(stopped, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = guard;
            if *stopped {
                return true;
            }
            if result.timed_out() {
                return false;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            remaining = duration - elapsed;
        }
    }
}

/// Owner side of a [`StopSignal`].
pub(crate) struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    pub(crate) fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        cvar.notify_all();
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Owner handle for one running timer thread.
///
/// [`cancel`](Self::cancel) stops and joins. Dropping only stops; the
/// thread exits on its next wakeup, which the stop signal makes immediate.
pub struct TimerHandle {
    generation: Generation,
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<()>>,
}

impl TimerHandle {
    /// Start `source` on a new thread.
    pub fn spawn(
        source: Box<dyn TickSource>,
        generation: Generation,
        sender: mpsc::Sender<Tick>,
    ) -> Self {
        let (signal, trigger) = StopSignal::new();
        tracing::debug!(generation, "starting scramble timer");
        let thread = thread::spawn(move || source.run(generation, sender, signal));
        Self {
            generation,
            trigger,
            thread: Some(thread),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether the timer thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(thread::JoinHandle::is_finished)
    }

    /// Stop the timer and wait for its thread to exit.
    pub fn cancel(mut self) {
        tracing::debug!(generation = self.generation, "cancelling scramble timer");
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.trigger.stop();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("generation", &self.generation)
            .field("finished", &self.is_finished())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Built-in sources
// ---------------------------------------------------------------------------

/// Fires every `period`, first tick one period after start.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: Duration,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl TickSource for Interval {
    fn run(&self, generation: Generation, sender: mpsc::Sender<Tick>, stop: StopSignal) {
        let mut sequence: u64 = 0;
        loop {
            if stop.wait_timeout(self.period) {
                tracing::trace!(generation, sent = sequence, "timer stopped");
                break;
            }
            sequence += 1;
            if sender
                .send(Tick {
                    generation,
                    sequence,
                })
                .is_err()
            {
                tracing::trace!(generation, sent = sequence, "timer channel closed");
                break;
            }
        }
    }
}

/// Sends `count` ticks immediately, then waits to be stopped.
///
/// For tests that need an exact number of ticks without real sleeps.
#[derive(Debug, Clone, Copy)]
pub struct MockTicks {
    count: u64,
}

impl MockTicks {
    pub fn new(count: u64) -> Self {
        Self { count }
    }
}

impl TickSource for MockTicks {
    fn run(&self, generation: Generation, sender: mpsc::Sender<Tick>, stop: StopSignal) {
        for sequence in 1..=self.count {
            if stop.is_stopped() || sender.send(Tick { generation, sequence }).is_err() {
                return;
            }
        }
        while !stop.wait_timeout(Duration::from_secs(1)) {}
    }
}
