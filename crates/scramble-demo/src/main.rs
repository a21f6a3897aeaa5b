#![forbid(unsafe_code)]

//! Scramble demo binary entry point.
//!
//! Cycles through a list of words on a single terminal line, scrambling
//! into each one and holding it before moving on.

mod cli;

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveToColumn, Show};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scramble::{ScrambleConfig, ScrambleDriver, ScrambleEvent};
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = cli::Opts::parse();
    if let Err(err) = run(&opts) {
        eprintln!("scramble-demo: {err}");
        std::process::exit(1);
    }
}

fn run(opts: &cli::Opts) -> scramble::Result<()> {
    if let Some(path) = &opts.log {
        init_logging(File::create(path)?);
    }

    let config = opts.scramble_config(ScrambleConfig::from_env()?)?;
    let rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(
        duration_ms = config.duration().as_millis() as u64,
        tick_ms = config.tick_interval().as_millis() as u64,
        steps = config.steps(),
        words = opts.words.len(),
        "scramble demo starting"
    );

    let wait = patience(config.tick_interval());
    let mut driver = ScrambleDriver::new("", config, rng);
    let mut out = io::stdout();
    execute!(out, Hide)?;

    let result = play(opts, &mut driver, &mut out, wait);

    driver.dispose();
    execute!(out, Show, Print("\n"))?;
    result
}

fn play(
    opts: &cli::Opts,
    driver: &mut ScrambleDriver<StdRng>,
    out: &mut impl Write,
    patience: Duration,
) -> scramble::Result<()> {
    for cycle in 0..opts.cycles {
        for word in &opts.words {
            driver.set_target(word);
            render(out, driver.display_text())?;
            while driver.is_animating() {
                if driver.pump_blocking(patience) == 0 && !driver.has_active_timer() {
                    tracing::warn!(target_word = %word, "timer ended before settle");
                    break;
                }
                render(out, driver.display_text())?;
            }
            for event in driver.drain_events() {
                match event {
                    ScrambleEvent::Started { target } => {
                        tracing::debug!(cycle, word = %target, "started");
                    }
                    ScrambleEvent::Interrupted { previous_target } => {
                        tracing::debug!(cycle, %previous_target, "interrupted");
                    }
                    ScrambleEvent::Settled { target } => {
                        tracing::info!(cycle, word = %target, stale = driver.stale_ticks(), "settled");
                    }
                }
            }
            thread::sleep(opts.hold());
        }
    }
    Ok(())
}

/// How long to wait for one tick before giving up on the current word.
fn patience(tick_interval: Duration) -> Duration {
    tick_interval.saturating_mul(4).max(Duration::from_secs(1))
}

fn render(out: &mut impl Write, text: &str) -> io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(text))?;
    out.flush()
}

fn init_logging(file: File) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
