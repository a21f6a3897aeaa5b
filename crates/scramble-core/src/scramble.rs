#![forbid(unsafe_code)]

//! Scramble transition: converge a display string onto a target string.
//!
//! Each tick reveals a growing prefix of the target while every other
//! position shows a random character from the configured
//! [`CharacterSet`]. When the step counter passes the configured step count
//! the display snaps to the target and the transition goes idle.
//!
//! # Tick rule
//!
//! With `steps` from [`ScrambleConfig::steps`], tick `s` renders with
//! `progress = s / steps`. Position `i` of the frame, for
//! `i < max(len(start), len(target))`, shows:
//!
//! - `' '` if the target or the starting display has a space at `i`;
//! - `target[i]` if `progress * len(target) > i`;
//! - a random noise character otherwise.
//!
//! `start` is the display at the moment the animation began. Lengths and
//! positions count `char`s.
//!
//! # Invariants
//!
//! 1. When idle, `display_text() == target()`.
//! 2. While animating, every frame is `max(len(start), len(target))` chars.
//! 3. Within one animation, a revealed position never reverts to noise.
//! 4. Spaces (in target or start) are never scrambled.
//! 5. `set_target` with the current target is a no-op.
//! 6. An empty target settles immediately and needs no timer.
//!
//! # Interruption
//!
//! A new target mid-animation restarts at step 0 from the current,
//! possibly scrambled, display. Reveal is recomputed against the new target,
//! so a position revealed by the old animation may scramble again.

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;

use crate::animation::Animation;
use crate::config::ScrambleConfig;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Undrained events kept per transition. Older events are discarded first.
pub const EVENT_CAPACITY: usize = 32;

/// Whether a transition is converging or holding its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrambleState {
    /// Display equals target; no tick is needed.
    Idle,
    /// A timer should be delivering ticks.
    Animating,
}

/// Result of one [`ScrambleTransition::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do; the transition was already idle.
    Idle,
    /// A frame was rendered and more ticks are needed.
    Advanced,
    /// The display snapped to the target; stop the timer.
    Settled,
}

/// Milestones queued by a transition, drained with
/// [`ScrambleTransition::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrambleEvent {
    /// An animation toward `target` began.
    Started { target: String },
    /// An in-flight animation toward `previous_target` was superseded.
    Interrupted { previous_target: String },
    /// The display reached `target`.
    Settled { target: String },
}

// ---------------------------------------------------------------------------
// ScrambleTransition
// ---------------------------------------------------------------------------

/// Tick-driven scramble from the current display to a target string.
///
/// Randomness comes from the injected `R`, so a seeded generator makes every
/// frame reproducible.
#[derive(Debug, Clone)]
pub struct ScrambleTransition<R> {
    config: ScrambleConfig,
    rng: R,
    display: String,
    target: String,
    target_chars: Vec<char>,
    start_chars: Vec<char>,
    step: u64,
    steps: u64,
    state: ScrambleState,
    /// Frame-time accumulator for [`Animation::tick`].
    pending: Duration,
    events: VecDeque<ScrambleEvent>,
    dropped_events: u64,
}

impl<R: Rng> ScrambleTransition<R> {
    /// Create an idle transition already showing `initial`.
    pub fn new(initial: impl Into<String>, config: ScrambleConfig, rng: R) -> Self {
        let display = initial.into();
        let steps = config.steps();
        Self {
            config,
            rng,
            target: display.clone(),
            target_chars: display.chars().collect(),
            start_chars: Vec::new(),
            display,
            step: 0,
            steps,
            state: ScrambleState::Idle,
            pending: Duration::ZERO,
            events: VecDeque::new(),
            dropped_events: 0,
        }
    }

    /// Request a new target.
    ///
    /// Returns `false` (and changes nothing) when `target` is already the
    /// target. Otherwise any in-flight animation is superseded and a new one
    /// starts from the current display.
    pub fn set_target(&mut self, target: &str) -> bool {
        if target == self.target {
            return false;
        }
        self.begin(target.to_string());
        true
    }

    /// Scramble into the current target again, from the current display.
    ///
    /// Returns whether ticks are now needed (`false` for an empty target).
    pub fn restart(&mut self) -> bool {
        let target = self.target.clone();
        self.begin(target);
        self.is_animating()
    }

    /// Run one timer callback's worth of work.
    pub fn step(&mut self) -> TickOutcome {
        if self.state == ScrambleState::Idle {
            return TickOutcome::Idle;
        }

        self.render_frame();
        self.step += 1;

        if self.step > self.steps {
            self.settle();
            return TickOutcome::Settled;
        }
        TickOutcome::Advanced
    }

    /// Snap to the target immediately.
    pub fn finish(&mut self) {
        if self.state == ScrambleState::Animating {
            self.settle();
        }
    }

    fn begin(&mut self, target: String) {
        if self.state == ScrambleState::Animating {
            crate::debug!(
                previous = %self.target,
                next = %target,
                step = self.step,
                "scramble interrupted"
            );
            let previous_target = std::mem::take(&mut self.target);
            self.push_event(ScrambleEvent::Interrupted { previous_target });
        }

        self.target_chars = target.chars().collect();
        self.target = target;
        self.step = 0;
        self.pending = Duration::ZERO;

        if self.target.is_empty() {
            self.start_chars.clear();
            self.display.clear();
            self.state = ScrambleState::Idle;
            self.push_event(ScrambleEvent::Settled {
                target: String::new(),
            });
            return;
        }

        self.start_chars = self.display.chars().collect();
        self.state = ScrambleState::Animating;
        crate::debug!(target_len = self.target_chars.len(), steps = self.steps, "scramble started");
        self.push_event(ScrambleEvent::Started {
            target: self.target.clone(),
        });
    }

    fn push_event(&mut self, event: ScrambleEvent) {
        if self.events.len() == EVENT_CAPACITY {
            self.events.pop_front();
            self.dropped_events += 1;
        }
        self.events.push_back(event);
    }

    fn settle(&mut self) {
        self.display.clone_from(&self.target);
        self.start_chars.clear();
        self.state = ScrambleState::Idle;
        self.pending = Duration::ZERO;
        crate::trace!(ticks = self.step, "scramble settled");
        self.push_event(ScrambleEvent::Settled {
            target: self.target.clone(),
        });
    }

    fn render_frame(&mut self) {
        let max_len = self.start_chars.len().max(self.target_chars.len());
        let mut frame = String::with_capacity(max_len);

        for i in 0..max_len {
            let target = self.target_chars.get(i).copied();
            if target == Some(' ') || self.start_chars.get(i) == Some(&' ') {
                frame.push(' ');
                continue;
            }
            match target {
                Some(c) if self.is_revealed(i) => frame.push(c),
                _ => frame.push(self.config.character_set().pick(&mut self.rng)),
            }
        }

        self.display = frame;
    }

    /// `progress * len(target) > index`, in exact integer arithmetic.
    fn is_revealed(&self, index: usize) -> bool {
        u128::from(self.step) * self.target_chars.len() as u128
            > index as u128 * u128::from(self.steps)
    }
}

impl<R> ScrambleTransition<R> {
    /// What a renderer should show right now.
    pub fn display_text(&self) -> &str {
        &self.display
    }

    /// The string being converged to (or held).
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn state(&self) -> ScrambleState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state == ScrambleState::Animating
    }

    /// Whether an owner should keep a timer running for this transition.
    pub fn needs_timer(&self) -> bool {
        self.is_animating()
    }

    /// Ticks taken by the current animation.
    pub fn current_step(&self) -> u64 {
        self.step
    }

    /// Steps in one animation; the animation settles on tick `steps`.
    pub fn total_steps(&self) -> u64 {
        self.steps
    }

    /// Reveal progress of the current animation in [0.0, 1.0]; 1.0 when idle.
    pub fn progress(&self) -> f32 {
        match self.state {
            ScrambleState::Idle => 1.0,
            ScrambleState::Animating => {
                (self.step as f64 / self.steps as f64).clamp(0.0, 1.0) as f32
            }
        }
    }

    pub fn config(&self) -> &ScrambleConfig {
        &self.config
    }

    /// Take all queued events, oldest first.
    ///
    /// At most [`EVENT_CAPACITY`] are kept between drains.
    pub fn drain_events(&mut self) -> Vec<ScrambleEvent> {
        self.events.drain(..).collect()
    }

    /// Events discarded because the queue was full.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }
}

// ---------------------------------------------------------------------------
// Frame-loop integration
// ---------------------------------------------------------------------------

impl<R: Rng> Animation for ScrambleTransition<R> {
    /// Accumulate `dt` and take one step per full tick interval.
    fn tick(&mut self, dt: Duration) {
        if !self.is_animating() {
            return;
        }
        let interval = self.config.tick_interval();
        self.pending = self.pending.saturating_add(dt);
        while self.pending >= interval && self.is_animating() {
            self.pending -= interval;
            self.step();
        }
    }

    fn is_complete(&self) -> bool {
        !self.is_animating()
    }

    fn value(&self) -> f32 {
        self.progress()
    }

    /// Restart toward the current target from the current display.
    fn reset(&mut self) {
        self.restart();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
