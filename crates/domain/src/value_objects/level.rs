//! Character level value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A character level, always within `[0, 99]`.
///
/// Level 99 is terminal: [`Level::next`] returns `None` there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// Highest reachable level.
    pub const MAX: Level = Level(99);

    /// Level every new character starts at.
    pub const ZERO: Level = Level(0);

    /// Create a validated level.
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if value > Self::MAX.0 {
            return Err(DomainError::validation(format!(
                "Level must be between 0 and {}, got {}",
                Self::MAX.0,
                value
            )));
        }
        Ok(Self(value))
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Level as a signed integer, for use in stat arithmetic.
    #[inline]
    pub fn as_i32(self) -> i32 {
        i32::from(self.0)
    }

    /// Level as an unsigned integer, for use in XP arithmetic.
    #[inline]
    pub fn as_u32(self) -> u32 {
        u32::from(self.0)
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    /// The following level, or `None` when already at the maximum.
    pub fn next(self) -> Option<Level> {
        if self.is_max() {
            None
        } else {
            Some(Level(self.0 + 1))
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_accepts_bounds() {
        assert_eq!(Level::new(0).unwrap(), Level::ZERO);
        assert_eq!(Level::new(99).unwrap(), Level::MAX);
    }

    #[test]
    fn level_rejects_above_max() {
        let err = Level::new(100).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn next_stops_at_max() {
        assert_eq!(Level::new(98).unwrap().next(), Some(Level::MAX));
        assert_eq!(Level::MAX.next(), None);
    }

    #[test]
    fn level_deserialization_enforces_range() {
        let level: Level = serde_json::from_str("42").unwrap();
        assert_eq!(level.value(), 42);
        assert!(serde_json::from_str::<Level>("100").is_err());
        assert!(serde_json::from_str::<Level>("-1").is_err());
    }
}
