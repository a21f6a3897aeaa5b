#![forbid(unsafe_code)]

//! Stagger utilities: per-item start offsets and shuffled play order.
//!
//! A letter swap plays one small animation per letter. [`shuffled_order`]
//! decides which letter goes first, and [`stagger_offsets`] decides how long
//! the `k`-th letter in that order waits before it moves.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` is empty; `stagger_offsets(1, ..)` is `[0]`.
//! 2. The first offset is always `Duration::ZERO`.
//! 3. Offsets are monotonically non-decreasing for every mode.
//! 4. For `Linear`, `offset[k] == k * delay` exactly.
//! 5. `shuffled_order(n, rng)` is a permutation of `0..n`.

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use super::{EasingFn, ease_in, ease_in_out, ease_out};

/// How to distribute delay offsets across items.
#[derive(Debug, Clone, Copy)]
pub enum StaggerMode {
    /// Equal spacing: offset[k] = k * delay.
    Linear,
    /// Gaps grow toward the end.
    EaseIn,
    /// Gaps shrink toward the end.
    EaseOut,
    /// Tight at both ends, wide in the middle.
    EaseInOut,
    /// Custom easing applied to normalized position.
    Custom(EasingFn),
}

/// Compute start offsets for `count` items spaced by `delay`.
///
/// The total span is `(count - 1) * delay`; eased modes redistribute the
/// items along that span.
#[must_use]
pub fn stagger_offsets(count: usize, delay: Duration, mode: StaggerMode) -> Vec<Duration> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![Duration::ZERO];
    }

    let easing: EasingFn = match mode {
        StaggerMode::Linear => {
            return (0..count)
                .map(|k| delay.saturating_mul(u32::try_from(k).unwrap_or(u32::MAX)))
                .collect();
        }
        StaggerMode::EaseIn => ease_in,
        StaggerMode::EaseOut => ease_out,
        StaggerMode::EaseInOut => ease_in_out,
        StaggerMode::Custom(f) => f,
    };

    let span_nanos = delay.as_nanos() as f64 * (count - 1) as f64;
    (0..count)
        .map(|k| {
            let t = k as f32 / (count - 1) as f32;
            Duration::from_nanos((span_nanos * f64::from(easing(t))) as u64)
        })
        .collect()
}

/// A uniformly shuffled permutation of `0..count`.
#[must_use]
pub fn shuffled_order<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..count).collect();
    order.shuffle(rng);
    order
}
