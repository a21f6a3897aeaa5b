#![forbid(unsafe_code)]

//! Command-line argument parsing for the scramble demo.
//!
//! Parses args by hand. Environment variables with the `SCRAMBLE_DEMO_*`
//! prefix provide defaults; explicit flags win.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use scramble::{CharacterSet, ConfigError, ScrambleConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
scramble-demo: scramble between words in the terminal

USAGE:
    scramble-demo [OPTIONS] [WORD]...

OPTIONS:
    --duration-ms=N   Total scramble time per word (default: 600)
    --tick-ms=N       Time between frames (default: 30)
    --charset=CHARS   Noise characters (default: A-Z a-z 0-9)
    --seed=N          Seed the noise generator for a reproducible run
    --hold-ms=N       Pause on each settled word (default: 1200)
    --cycles=N        Passes through the word list (default: 1)
    --log=PATH        Write tracing output to PATH (filter with RUST_LOG)
    --help, -h        Show this help message
    --version, -V     Show version

WORDS:
    Targets to scramble through, in order.
    Default: Projects About Contacts \"Fill out form\"

ENVIRONMENT VARIABLES:
    SCRAMBLE_DURATION_MS      Library default for --duration-ms
    SCRAMBLE_TICK_MS          Library default for --tick-ms
    SCRAMBLE_CHARSET          Library default for --charset
    SCRAMBLE_DEMO_SEED        Override --seed
    SCRAMBLE_DEMO_HOLD_MS     Override --hold-ms
    SCRAMBLE_DEMO_CYCLES      Override --cycles
    SCRAMBLE_DEMO_LOG         Override --log";

const DEFAULT_WORDS: [&str; 4] = ["Projects", "About", "Contacts", "Fill out form"];

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub duration_ms: Option<u64>,
    pub tick_ms: Option<u64>,
    pub charset: Option<String>,
    pub seed: Option<u64>,
    pub hold_ms: u64,
    pub cycles: u32,
    pub log: Option<PathBuf>,
    pub words: Vec<String>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            duration_ms: None,
            tick_ms: None,
            charset: None,
            seed: None,
            hold_ms: 1200,
            cycles: 1,
            log: None,
            words: DEFAULT_WORDS.iter().map(|w| (*w).to_string()).collect(),
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// A flag value that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    InvalidValue { flag: &'static str, value: String },
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse process arguments and environment, exiting on help, version,
    /// or bad input.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("scramble-demo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    pub fn parse_from(
        args: impl IntoIterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Command, CliError> {
        let mut opts = Self::default();

        // Environment first; flags below override.
        if let Some(val) = lookup("SCRAMBLE_DEMO_SEED") {
            opts.seed = Some(number("SCRAMBLE_DEMO_SEED", &val)?);
        }
        if let Some(val) = lookup("SCRAMBLE_DEMO_HOLD_MS") {
            opts.hold_ms = number("SCRAMBLE_DEMO_HOLD_MS", &val)?;
        }
        if let Some(val) = lookup("SCRAMBLE_DEMO_CYCLES") {
            opts.cycles = number("SCRAMBLE_DEMO_CYCLES", &val)?;
        }
        if let Some(val) = lookup("SCRAMBLE_DEMO_LOG") {
            opts.log = Some(PathBuf::from(val));
        }

        let mut words = Vec::new();
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--duration-ms=") {
                        opts.duration_ms = Some(number("--duration-ms", val)?);
                    } else if let Some(val) = other.strip_prefix("--tick-ms=") {
                        opts.tick_ms = Some(number("--tick-ms", val)?);
                    } else if let Some(val) = other.strip_prefix("--charset=") {
                        opts.charset = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(number("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--hold-ms=") {
                        opts.hold_ms = number("--hold-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--cycles=") {
                        opts.cycles = number("--cycles", val)?;
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log = Some(PathBuf::from(val));
                    } else if other.starts_with("--") {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    } else {
                        words.push(other.to_string());
                    }
                }
            }
        }
        if !words.is_empty() {
            opts.words = words;
        }

        Ok(Command::Run(opts))
    }

    /// Apply the timing and charset flags on top of `base`.
    pub fn scramble_config(&self, base: ScrambleConfig) -> Result<ScrambleConfig, ConfigError> {
        let mut config = base;
        if let Some(ms) = self.duration_ms {
            config = config.with_duration(Duration::from_millis(ms));
        }
        if let Some(ms) = self.tick_ms {
            config = config.with_tick_interval(Duration::from_millis(ms))?;
        }
        if let Some(chars) = &self.charset {
            config = config.with_character_set(CharacterSet::new(chars)?);
        }
        Ok(config)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}

fn number<T: std::str::FromStr>(flag: &'static str, value: &str) -> Result<T, CliError> {
    value.trim().parse().map_err(|_| CliError::InvalidValue {
        flag,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Command, CliError> {
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Opts::parse_from(args.iter().map(|a| (*a).to_string()), move |key| {
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    }

    fn run_opts(args: &[&str], env: &[(&str, &str)]) -> Opts {
        match parse(args, env) {
            Ok(Command::Run(opts)) => opts,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = run_opts(&[], &[]);
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.words.len(), 4);
        assert_eq!(opts.cycles, 1);
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["--help"], &[]), Ok(Command::Help));
        assert_eq!(parse(&["-V"], &[]), Ok(Command::Version));
        assert!(!VERSION.is_empty());
        assert!(HELP_TEXT.contains("--duration-ms"));
    }

    #[test]
    fn flags_and_words() {
        let opts = run_opts(
            &["--duration-ms=900", "--tick-ms=15", "--seed=4", "HELLO", "WORLD"],
            &[],
        );
        assert_eq!(opts.duration_ms, Some(900));
        assert_eq!(opts.tick_ms, Some(15));
        assert_eq!(opts.seed, Some(4));
        assert_eq!(opts.words, vec!["HELLO", "WORLD"]);
    }

    #[test]
    fn flags_override_env() {
        let opts = run_opts(
            &["--cycles=3"],
            &[("SCRAMBLE_DEMO_CYCLES", "9"), ("SCRAMBLE_DEMO_HOLD_MS", "10")],
        );
        assert_eq!(opts.cycles, 3);
        assert_eq!(opts.hold_ms, 10);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert_eq!(
            parse(&["--tick-ms=fast"], &[]),
            Err(CliError::InvalidValue {
                flag: "--tick-ms",
                value: "fast".into()
            })
        );
        assert_eq!(
            parse(&["--bogus"], &[]),
            Err(CliError::UnknownArgument("--bogus".into()))
        );
        assert!(parse(&[], &[("SCRAMBLE_DEMO_SEED", "x")]).is_err());
    }

    #[test]
    fn scramble_config_applies_overrides() {
        let opts = run_opts(&["--duration-ms=100", "--tick-ms=10", "--charset=01"], &[]);
        let config = opts.scramble_config(ScrambleConfig::default()).unwrap();
        assert_eq!(config.steps(), 10);
        assert_eq!(config.character_set().len(), 2);
    }

    #[test]
    fn scramble_config_rejects_zero_tick_and_empty_charset() {
        let opts = run_opts(&["--tick-ms=0"], &[]);
        assert_eq!(
            opts.scramble_config(ScrambleConfig::default()),
            Err(ConfigError::ZeroTickInterval)
        );
        let opts = run_opts(&["--charset="], &[]);
        assert_eq!(
            opts.scramble_config(ScrambleConfig::default()),
            Err(ConfigError::EmptyCharacterSet)
        );
    }
}
