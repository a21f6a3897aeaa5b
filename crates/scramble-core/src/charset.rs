#![forbid(unsafe_code)]

//! Noise alphabets for not-yet-revealed positions.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;

use crate::config::ConfigError;

/// Upper and lower ASCII letters followed by the ten digits.
pub const ALPHANUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// An immutable, non-empty, ordered set of noise characters.
///
/// Cloning is cheap; the characters are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct CharacterSet {
    chars: Arc<[char]>,
}

impl CharacterSet {
    /// Build a set from the characters of `chars`, in order.
    ///
    /// Duplicates are kept, which weights the draw toward them.
    pub fn new(chars: &str) -> Result<Self, ConfigError> {
        let chars: Arc<[char]> = chars.chars().collect();
        if chars.is_empty() {
            return Err(ConfigError::EmptyCharacterSet);
        }
        Ok(Self { chars })
    }

    /// The default alphabet, [`ALPHANUMERIC`].
    pub fn alphanumeric() -> Self {
        Self {
            chars: ALPHANUMERIC.chars().collect(),
        }
    }

    /// Number of characters (at least 1).
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The characters in order.
    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }

    /// Whether `c` can be drawn.
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Draw one character uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.chars[rng.gen_range(0..self.chars.len())]
    }
}

impl Default for CharacterSet {
    fn default() -> Self {
        Self::alphanumeric()
    }
}

impl FromStr for CharacterSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacterSet")
            .field("len", &self.chars.len())
            .finish()
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars.iter() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
