#![forbid(unsafe_code)]

//! Scramble timing and alphabet configuration.
//!
//! Values come from code (the builder methods), or from the environment via
//! [`ScrambleConfig::from_env`]:
//!
//! | variable               | meaning                       |
//! |------------------------|-------------------------------|
//! | `SCRAMBLE_DURATION_MS` | total animation time          |
//! | `SCRAMBLE_TICK_MS`     | time between ticks (non-zero) |
//! | `SCRAMBLE_CHARSET`     | noise characters (non-empty)  |

use std::fmt;
use std::time::Duration;

use crate::charset::CharacterSet;

/// Default total animation time for a text transition.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(600);
/// Default time between ticks for a text transition.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(30);
/// Total animation time used by [`ScrambleConfig::link`].
pub const LINK_DURATION: Duration = Duration::from_millis(500);
/// Time between ticks used by [`ScrambleConfig::link`].
pub const LINK_TICK_INTERVAL: Duration = Duration::from_millis(20);

pub const ENV_DURATION_MS: &str = "SCRAMBLE_DURATION_MS";
pub const ENV_TICK_MS: &str = "SCRAMBLE_TICK_MS";
pub const ENV_CHARSET: &str = "SCRAMBLE_CHARSET";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Invalid scramble configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A character set must contain at least one character.
    EmptyCharacterSet,
    /// The tick interval must be non-zero.
    ZeroTickInterval,
    /// An environment variable held an unparseable value.
    InvalidEnv {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCharacterSet => write!(f, "character set must not be empty"),
            Self::ZeroTickInterval => write!(f, "tick interval must be greater than zero"),
            Self::InvalidEnv { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Timing and alphabet for one scramble effect.
///
/// Always valid once constructed: the tick interval is non-zero and the
/// character set is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrambleConfig {
    duration: Duration,
    tick_interval: Duration,
    character_set: CharacterSet,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            tick_interval: DEFAULT_TICK_INTERVAL,
            character_set: CharacterSet::alphanumeric(),
        }
    }
}

impl ScrambleConfig {
    /// Build a config, rejecting a zero tick interval.
    pub fn new(
        duration: Duration,
        tick_interval: Duration,
        character_set: CharacterSet,
    ) -> Result<Self, ConfigError> {
        Self::default()
            .with_duration(duration)
            .with_tick_interval(tick_interval)
            .map(|config| config.with_character_set(character_set))
    }

    /// Faster preset used for hover links.
    pub fn link() -> Self {
        Self {
            duration: LINK_DURATION,
            tick_interval: LINK_TICK_INTERVAL,
            character_set: CharacterSet::alphanumeric(),
        }
    }

    /// Set the total animation time. Zero is allowed and yields one step.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the time between ticks.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Result<Self, ConfigError> {
        if tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        self.tick_interval = tick_interval;
        Ok(self)
    }

    /// Set the noise alphabet.
    #[must_use]
    pub fn with_character_set(mut self, character_set: CharacterSet) -> Self {
        self.character_set = character_set;
        self
    }

    /// Defaults overridden by `SCRAMBLE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overridden_by(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (an environment stand-in) on top of `self`.
    pub fn overridden_by(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = self;
        if let Some(value) = lookup(ENV_DURATION_MS) {
            config = config.with_duration(Duration::from_millis(parse_millis(
                ENV_DURATION_MS,
                &value,
            )?));
        }
        if let Some(value) = lookup(ENV_TICK_MS) {
            let millis = parse_millis(ENV_TICK_MS, &value)?;
            config = config.with_tick_interval(Duration::from_millis(millis))?;
        }
        if let Some(value) = lookup(ENV_CHARSET) {
            config = config.with_character_set(CharacterSet::new(&value)?);
        }
        Ok(config)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn character_set(&self) -> &CharacterSet {
        &self.character_set
    }

    /// Number of steps in one animation: `ceil(duration / tick_interval)`,
    /// at least 1.
    pub fn steps(&self) -> u64 {
        let steps = self
            .duration
            .as_nanos()
            .div_ceil(self.tick_interval.as_nanos())
            .max(1);
        u64::try_from(steps).unwrap_or(u64::MAX)
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}
