//! Volume — an integer level in `0..=100`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated volume level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;

    /// Build a volume, returning `None` above [`Volume::MAX`].
    #[must_use]
    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX).then_some(Self(level))
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Volume {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(ValidationError::VolumeOutOfRange(value))
    }
}

impl From<Volume> for i64 {
    fn from(volume: Volume) -> Self {
        Self::from(volume.0)
    }
}

impl FromStr for Volume {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level: i64 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidVolume(s.to_string()))?;
        Self::try_from(level).map_err(|_| ValidationError::InvalidVolume(s.to_string()))
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_bounds() {
        assert_eq!(Volume::try_from(0).unwrap().get(), 0);
        assert_eq!(Volume::try_from(100).unwrap().get(), 100);
    }

    #[test]
    fn should_reject_out_of_range_levels() {
        assert_eq!(
            Volume::try_from(101),
            Err(ValidationError::VolumeOutOfRange(101))
        );
        assert_eq!(
            Volume::try_from(-1),
            Err(ValidationError::VolumeOutOfRange(-1))
        );
    }

    #[test]
    fn should_parse_padded_and_trimmed_tokens() {
        assert_eq!("030".parse::<Volume>().unwrap().to_string(), "30");
        assert_eq!(" 45 ".parse::<Volume>().unwrap().get(), 45);
    }

    #[test]
    fn should_reject_non_numeric_tokens() {
        assert!("loud".parse::<Volume>().is_err());
        assert!("12.5".parse::<Volume>().is_err());
    }

    #[test]
    fn should_reject_out_of_range_json() {
        let parsed: Result<Volume, _> = serde_json::from_str("150");
        assert!(parsed.is_err());
    }
}
