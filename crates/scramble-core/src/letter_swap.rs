#![forbid(unsafe_code)]

//! Random letter swap: each letter of a label is replaced by a second copy
//! sliding in from above (or below), one letter at a time in shuffled order.
//!
//! Every letter owns a delayed, eased [`Fade`]. The delay of the `k`-th
//! letter in the shuffled order comes from
//! [`stagger_offsets`](crate::animation::stagger::stagger_offsets).
//!
//! # Modes
//!
//! - [`SwapMode::PingPong`]: `hover_start` slides the secondary copy in and
//!   holds it; `hover_end` slides it back out.
//! - [`SwapMode::Forward`]: `hover_start` slides the secondary copy in; each
//!   letter snaps back to the primary copy once its own slide finishes.
//!
//! # Debounce
//!
//! Each hover handler is debounced on tick time, leading and trailing: the
//! first call acts at once, calls inside the window only restart it, and if
//! any arrived, one more call runs when the window closes.
//!
//! # Invariants
//!
//! 1. Every offset is in [0.0, 1.0].
//! 2. `hover_start` is ignored while the swap is blocked.
//! 3. In forward mode the swap unblocks only after every letter snapped back.
//! 4. The shuffled order is a permutation of the letter indices.

use std::time::Duration;

use rand::Rng;

use crate::animation::stagger::{StaggerMode, shuffled_order, stagger_offsets};
use crate::animation::{Animation, Delayed, EasingFn, Fade, delay, ease_out_cubic};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How a swap ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapMode {
    /// Swap in on hover start, swap out on hover end.
    PingPong,
    /// Swap in, then snap back without waiting for hover end.
    Forward,
}

/// Which way the primary copy leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// Primary exits downward; secondary enters from above.
    Down,
    /// Primary exits upward; secondary enters from below.
    Up,
}

/// Letter swap timing.
#[derive(Debug, Clone, Copy)]
pub struct LetterSwapConfig {
    pub mode: SwapMode,
    /// `true` slides [`SlideDirection::Down`].
    pub reverse: bool,
    /// Slide time of one letter.
    pub duration: Duration,
    /// Gap between consecutive letters in the shuffled order.
    pub stagger: Duration,
    pub stagger_mode: StaggerMode,
    pub easing: EasingFn,
    /// Hover debounce window. Zero disables debouncing.
    pub debounce: Duration,
}

impl Default for LetterSwapConfig {
    fn default() -> Self {
        Self {
            mode: SwapMode::PingPong,
            reverse: true,
            duration: Duration::from_millis(800),
            stagger: Duration::from_millis(20),
            stagger_mode: StaggerMode::Linear,
            easing: ease_out_cubic,
            debounce: Duration::from_millis(100),
        }
    }
}

impl LetterSwapConfig {
    /// Default timing in forward mode.
    pub fn forward() -> Self {
        Self {
            mode: SwapMode::Forward,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Letters
// ---------------------------------------------------------------------------

/// One letter as a renderer should draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterFrame {
    /// Position in the label.
    pub index: usize,
    pub glyph: char,
    /// How far the secondary copy has replaced the primary, in [0.0, 1.0].
    pub offset: f32,
}

#[derive(Debug, Clone, Copy)]
struct Letter {
    glyph: char,
    from: f32,
    to: f32,
    motion: Option<Delayed<Fade>>,
}

impl Letter {
    fn offset(&self) -> f32 {
        match &self.motion {
            Some(motion) => (self.from + (self.to - self.from) * motion.value()).clamp(0.0, 1.0),
            None => self.to,
        }
    }
}

/// Leading and trailing debounce measured in ticked time.
#[derive(Debug, Clone, Copy, Default)]
struct Debounce {
    /// Time left in the open window, if any.
    remaining: Option<Duration>,
    trailing: bool,
}

impl Debounce {
    /// Register a call. Returns `true` if it should act now.
    fn call(&mut self, window: Duration) -> bool {
        if window.is_zero() {
            return true;
        }
        let leading = self.remaining.is_none();
        self.remaining = Some(window);
        if !leading {
            self.trailing = true;
        }
        leading
    }

    /// Advance the window. Returns `true` when a trailing call is due.
    fn advance(&mut self, dt: Duration) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        if dt < remaining {
            self.remaining = Some(remaining - dt);
            return false;
        }
        self.remaining = None;
        std::mem::take(&mut self.trailing)
    }
}

// ---------------------------------------------------------------------------
// LetterSwap
// ---------------------------------------------------------------------------

/// Staggered per-letter swap of a label.
#[derive(Debug, Clone)]
pub struct LetterSwap {
    letters: Vec<Letter>,
    order: Vec<usize>,
    /// Start delay per letter index.
    delays: Vec<Duration>,
    config: LetterSwapConfig,
    blocked: bool,
    start_gate: Debounce,
    end_gate: Debounce,
}

impl LetterSwap {
    /// Create a resting swap for `label`, shuffling the letter order with `rng`.
    pub fn new<R: Rng + ?Sized>(label: &str, config: LetterSwapConfig, rng: &mut R) -> Self {
        let letters = label
            .chars()
            .map(|glyph| Letter {
                glyph,
                from: 0.0,
                to: 0.0,
                motion: None,
            })
            .collect();
        let mut swap = Self {
            letters,
            order: Vec::new(),
            delays: Vec::new(),
            config,
            blocked: false,
            start_gate: Debounce::default(),
            end_gate: Debounce::default(),
        };
        swap.reshuffle(rng);
        swap
    }

    /// Draw a new letter order. Motions already in flight keep their delays.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = self.letters.len();
        self.order = shuffled_order(count, rng);
        let offsets = stagger_offsets(count, self.config.stagger, self.config.stagger_mode);
        self.delays = vec![Duration::ZERO; count];
        for (&index, offset) in self.order.iter().zip(offsets) {
            self.delays[index] = offset;
        }
    }

    /// Pointer entered. Returns `true` if a swap started now; a call inside
    /// the debounce window may instead start one when the window closes.
    pub fn hover_start(&mut self) -> bool {
        self.start_gate.call(self.config.debounce) && self.swap_in()
    }

    /// Pointer left. Only meaningful in ping-pong mode; returns whether a
    /// swap back started now.
    pub fn hover_end(&mut self) -> bool {
        if self.config.mode != SwapMode::PingPong {
            return false;
        }
        self.end_gate.call(self.config.debounce) && self.swap_out()
    }

    fn swap_in(&mut self) -> bool {
        if self.blocked || self.letters.is_empty() {
            return false;
        }
        self.blocked = true;
        crate::trace!(letters = self.letters.len(), "letter swap in");
        self.animate_to(1.0);
        true
    }

    fn swap_out(&mut self) -> bool {
        if self.letters.is_empty() {
            return false;
        }
        self.blocked = false;
        crate::trace!(letters = self.letters.len(), "letter swap out");
        self.animate_to(0.0);
        true
    }

    fn animate_to(&mut self, to: f32) {
        let fade = Fade::new(self.config.duration).easing(self.config.easing);
        for (letter, &start) in self.letters.iter_mut().zip(&self.delays) {
            letter.from = letter.offset();
            letter.to = to;
            letter.motion = Some(delay(start, fade));
        }
    }

    fn letters_at_rest(&self) -> bool {
        self.letters.iter().all(|l| l.motion.is_none())
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn direction(&self) -> SlideDirection {
        if self.config.reverse {
            SlideDirection::Down
        } else {
            SlideDirection::Up
        }
    }

    pub fn config(&self) -> &LetterSwapConfig {
        &self.config
    }

    /// Letter indices in the order they start moving.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Start delay of the letter at `index`.
    pub fn delay_of(&self, index: usize) -> Option<Duration> {
        self.delays.get(index).copied()
    }

    pub fn label(&self) -> String {
        self.letters.iter().map(|l| l.glyph).collect()
    }

    /// Current frame of every letter, in label order.
    pub fn letters(&self) -> impl Iterator<Item = LetterFrame> + '_ {
        self.letters
            .iter()
            .enumerate()
            .map(|(index, letter)| LetterFrame {
                index,
                glyph: letter.glyph,
                offset: letter.offset(),
            })
    }
}

impl Animation for LetterSwap {
    fn tick(&mut self, dt: Duration) {
        let forward = self.config.mode == SwapMode::Forward;
        for letter in &mut self.letters {
            let Some(motion) = letter.motion.as_mut() else {
                continue;
            };
            motion.tick(dt);
            if motion.is_complete() {
                letter.motion = None;
                if forward && letter.to > 0.0 {
                    letter.to = 0.0;
                }
                letter.from = letter.to;
            }
        }

        if self.start_gate.advance(dt) {
            self.swap_in();
        }
        if self.end_gate.advance(dt) {
            self.swap_out();
        }

        if forward && self.blocked && self.letters_at_rest() {
            crate::trace!("letter swap unblocked");
            self.blocked = false;
        }
    }

    fn is_complete(&self) -> bool {
        self.letters_at_rest() && !self.start_gate.trailing && !self.end_gate.trailing
    }

    /// Mean offset across letters.
    fn value(&self) -> f32 {
        if self.letters.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.letters.iter().map(Letter::offset).sum();
        sum / self.letters.len() as f32
    }

    fn reset(&mut self) {
        for letter in &mut self.letters {
            letter.from = 0.0;
            letter.to = 0.0;
            letter.motion = None;
        }
        self.blocked = false;
        self.start_gate = Debounce::default();
        self.end_gate = Debounce::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
