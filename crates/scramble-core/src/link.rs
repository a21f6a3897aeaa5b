#![forbid(unsafe_code)]

//! Hover-triggered scramble of a fixed label.
//!
//! Hovering scrambles the label into itself once. Further hovers are ignored
//! until that scramble completes, after which the link is armed again.

use std::time::Duration;

use rand::Rng;

use crate::animation::Animation;
use crate::config::ScrambleConfig;
use crate::scramble::{ScrambleEvent, ScrambleTransition, TickOutcome};

/// A label that re-scrambles on hover.
#[derive(Debug, Clone)]
pub struct ScrambleLink<R> {
    transition: ScrambleTransition<R>,
    triggered: bool,
}

impl<R: Rng> ScrambleLink<R> {
    /// Create a link with the faster [`ScrambleConfig::link`] timing.
    pub fn new(label: impl Into<String>, rng: R) -> Self {
        Self::with_config(label, ScrambleConfig::link(), rng)
    }

    pub fn with_config(label: impl Into<String>, config: ScrambleConfig, rng: R) -> Self {
        Self {
            transition: ScrambleTransition::new(label, config, rng),
            triggered: false,
        }
    }

    /// Pointer entered the link.
    ///
    /// Returns `true` if a scramble started. Ignored while one is running.
    pub fn hover_start(&mut self) -> bool {
        if self.triggered {
            return false;
        }
        self.triggered = self.transition.restart();
        self.triggered
    }

    /// One timer tick. Re-arms the link on the settling tick.
    pub fn step(&mut self) -> TickOutcome {
        let outcome = self.transition.step();
        if outcome == TickOutcome::Settled {
            self.on_scramble_complete();
        }
        outcome
    }

    fn on_scramble_complete(&mut self) {
        crate::trace!(label = %self.transition.target(), "link re-armed");
        self.triggered = false;
    }
}

impl<R> ScrambleLink<R> {
    pub fn display_text(&self) -> &str {
        self.transition.display_text()
    }

    pub fn label(&self) -> &str {
        self.transition.target()
    }

    /// Whether a hover scramble is running.
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn transition(&self) -> &ScrambleTransition<R> {
        &self.transition
    }

    pub fn drain_events(&mut self) -> Vec<ScrambleEvent> {
        self.transition.drain_events()
    }
}

impl<R: Rng> Animation for ScrambleLink<R> {
    fn tick(&mut self, dt: Duration) {
        self.transition.tick(dt);
        if self.triggered && !self.transition.is_animating() {
            self.on_scramble_complete();
        }
    }

    fn is_complete(&self) -> bool {
        !self.triggered
    }

    fn value(&self) -> f32 {
        self.transition.value()
    }

    fn reset(&mut self) {
        self.transition.finish();
        self.triggered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharacterSet;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn link(label: &str) -> ScrambleLink<StdRng> {
        let config = ScrambleConfig::link().with_character_set(CharacterSet::new("*").unwrap());
        ScrambleLink::with_config(label, config, StdRng::seed_from_u64(3))
    }

    #[test]
    fn starts_armed_and_settled() {
        let l = link("Contacts");
        assert!(!l.is_triggered());
        assert_eq!(l.display_text(), "Contacts");
        assert_eq!(l.label(), "Contacts");
    }

    #[test]
    fn hover_scrambles_once() {
        let mut l = link("Contacts");
        assert!(l.hover_start());
        assert!(l.is_triggered());
        assert!(!l.hover_start(), "repeat hover must be ignored");
        l.step();
        assert_eq!(l.display_text(), "********");
    }

    #[test]
    fn completion_rearms() {
        let mut l = link("Fill out form");
        l.hover_start();
        let mut ticks = 0;
        while l.step() != TickOutcome::Settled {
            ticks += 1;
            assert!(ticks < 100);
        }
        assert!(!l.is_triggered());
        assert_eq!(l.display_text(), "Fill out form");
        assert!(l.hover_start());
    }

    #[test]
    fn frame_ticks_rearm() {
        let mut l = link("Back to projects");
        l.hover_start();
        l.tick(Duration::from_secs(1));
        assert!(l.is_complete());
        assert_eq!(l.display_text(), "Back to projects");
    }

    #[test]
    fn empty_label_never_triggers() {
        let mut l = link("");
        assert!(!l.hover_start());
        assert!(!l.is_triggered());
    }

    #[test]
    fn reset_finishes_scramble() {
        let mut l = link("Projects");
        l.hover_start();
        l.step();
        l.reset();
        assert!(!l.is_triggered());
        assert_eq!(l.display_text(), "Projects");
    }

    #[test]
    fn repeated_hovers_without_draining_stay_bounded() {
        let mut l = link("Projects");
        for _ in 0..10_000 {
            assert!(l.hover_start());
            l.tick(Duration::from_secs(1));
        }
        assert!(l.transition().pending_event_count() <= crate::scramble::EVENT_CAPACITY);
        assert_eq!(l.display_text(), "Projects");
    }
}
