//! Property tests for the scramble transition.

use std::time::Duration;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use scramble_core::{CharacterSet, ScrambleConfig, ScrambleTransition, TickOutcome};

fn config(duration_ms: u64, tick_ms: u64) -> ScrambleConfig {
    ScrambleConfig::default()
        .with_duration(Duration::from_millis(duration_ms))
        .with_tick_interval(Duration::from_millis(tick_ms))
        .expect("non-zero tick")
        .with_character_set(CharacterSet::new("!@#$%").expect("non-empty"))
}

/// Step until settled, returning every frame rendered while animating.
fn run(t: &mut ScrambleTransition<StdRng>) -> Vec<Vec<char>> {
    let mut frames = Vec::new();
    loop {
        match t.step() {
            TickOutcome::Advanced => frames.push(t.display_text().chars().collect()),
            TickOutcome::Settled | TickOutcome::Idle => return frames,
        }
    }
}

fn text() -> impl Strategy<Value = String> {
    "[A-Za-z ]{0,24}"
}

#[test]
fn hello_to_world_interrupt_converges() {
    for interrupt_at in 0..12 {
        let mut t = ScrambleTransition::new("", config(300, 30), StdRng::seed_from_u64(1));
        t.set_target("HELLO");
        for _ in 0..interrupt_at {
            t.step();
        }
        t.set_target("WORLD");
        run(&mut t);
        assert_eq!(t.display_text(), "WORLD", "interrupted after {interrupt_at}");
    }
}

#[test]
fn tick_count_is_steps_plus_one() {
    let mut t = ScrambleTransition::new("", config(300, 100), StdRng::seed_from_u64(2));
    t.set_target("CAT");
    let frames = run(&mut t);
    // Ticks 0..steps-1 advance; tick `steps` settles.
    assert_eq!(frames.len(), 3);
}

proptest! {
    #[test]
    fn always_converges_to_target(
        start in text(),
        target in text(),
        duration_ms in 0u64..400,
        tick_ms in 1u64..60,
        seed in any::<u64>(),
    ) {
        let mut t = ScrambleTransition::new(start, config(duration_ms, tick_ms), StdRng::seed_from_u64(seed));
        t.set_target(&target);
        run(&mut t);
        prop_assert_eq!(t.display_text(), target.as_str());
        prop_assert!(!t.needs_timer());
    }

    #[test]
    fn frame_width_is_max_of_start_and_target(
        start in text(),
        target in text(),
        seed in any::<u64>(),
    ) {
        let start_len = start.chars().count();
        let target_len = target.chars().count();
        let mut t = ScrambleTransition::new(start, config(200, 20), StdRng::seed_from_u64(seed));
        t.set_target(&target);
        for frame in run(&mut t) {
            prop_assert_eq!(frame.len(), start_len.max(target_len));
        }
    }

    #[test]
    fn spaces_never_scramble(
        start in text(),
        target in text(),
        seed in any::<u64>(),
    ) {
        let start_chars: Vec<char> = start.chars().collect();
        let target_chars: Vec<char> = target.chars().collect();
        let mut t = ScrambleTransition::new(start, config(200, 20), StdRng::seed_from_u64(seed));
        t.set_target(&target);
        for frame in run(&mut t) {
            for (i, c) in frame.iter().enumerate() {
                if target_chars.get(i) == Some(&' ') || start_chars.get(i) == Some(&' ') {
                    prop_assert_eq!(*c, ' ');
                }
            }
        }
    }

    #[test]
    fn revealed_positions_stay_revealed(
        target in "[A-Z]{1,20}",
        seed in any::<u64>(),
    ) {
        let target_chars: Vec<char> = target.chars().collect();
        let mut t = ScrambleTransition::new("", config(300, 30), StdRng::seed_from_u64(seed));
        t.set_target(&target);
        let frames = run(&mut t);
        // Noise uses punctuation only, so a letter in place means revealed.
        for pair in frames.windows(2) {
            for i in 0..target_chars.len() {
                if pair[0][i] == target_chars[i] {
                    prop_assert_eq!(pair[1][i], target_chars[i]);
                }
            }
        }
    }

    #[test]
    fn settled_repeat_target_is_noop(target in text(), seed in any::<u64>()) {
        let mut t = ScrambleTransition::new("", config(100, 10), StdRng::seed_from_u64(seed));
        t.set_target(&target);
        run(&mut t);
        t.drain_events();
        prop_assert!(!t.set_target(&target));
        prop_assert!(!t.needs_timer());
        prop_assert_eq!(t.display_text(), target.as_str());
        prop_assert_eq!(t.pending_event_count(), 0);
    }

    #[test]
    fn noise_comes_from_character_set(target in "[A-Z]{1,16}", seed in any::<u64>()) {
        let set = CharacterSet::new("!@#$%").expect("non-empty");
        let mut t = ScrambleTransition::new("", config(200, 20), StdRng::seed_from_u64(seed));
        t.set_target(&target);
        for frame in run(&mut t) {
            for c in frame {
                prop_assert!(set.contains(c) || target.contains(c));
            }
        }
    }
}
