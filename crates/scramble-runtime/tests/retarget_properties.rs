//! Property tests for timer ownership under arbitrary retargeting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use scramble_core::{CharacterSet, ScrambleConfig};
use scramble_runtime::{Generation, MockTicks, ScrambleDriver, StopSignal, Tick, TickSource};

const WAIT: Duration = Duration::from_secs(5);

/// Live and peak thread counts shared by every timer of one driver.
#[derive(Default)]
struct Census {
    live: AtomicUsize,
    peak: AtomicUsize,
}

struct Counted {
    inner: MockTicks,
    census: Arc<Census>,
}

impl TickSource for Counted {
    fn run(&self, generation: Generation, sender: mpsc::Sender<Tick>, stop: StopSignal) {
        let live = self.census.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.census.peak.fetch_max(live, Ordering::SeqCst);
        self.inner.run(generation, sender, stop);
        self.census.live.fetch_sub(1, Ordering::SeqCst);
    }
}

fn counted_driver(census: &Arc<Census>) -> ScrambleDriver<StdRng> {
    let config = ScrambleConfig::default()
        .with_duration(Duration::from_millis(100))
        .with_tick_interval(Duration::from_millis(10))
        .expect("non-zero tick")
        .with_character_set(CharacterSet::new("#").expect("non-empty"));
    let census = census.clone();
    ScrambleDriver::with_tick_source("", config, StdRng::seed_from_u64(5), move |_| {
        Box::new(Counted {
            inner: MockTicks::new(64),
            census: census.clone(),
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn retargets_keep_one_timer_and_settle_on_last(
        script in prop::collection::vec(("[A-Z ]{0,8}", 0usize..3), 1..8),
    ) {
        let census = Arc::new(Census::default());
        let mut d = counted_driver(&census);
        for (word, pumps) in &script {
            d.set_target(word);
            for _ in 0..*pumps {
                d.pump();
            }
        }
        let last = &script[script.len() - 1].0;
        prop_assert!(d.wait_settled(WAIT));
        prop_assert_eq!(d.display_text(), last.as_str());
        prop_assert!(!d.has_active_timer());
        drop(d);
        prop_assert!(census.peak.load(Ordering::SeqCst) <= 1);
        prop_assert_eq!(census.live.load(Ordering::SeqCst), 0);
    }
}
