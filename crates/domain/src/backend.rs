//! Backend kinds — how a step reaches the rooms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigStateError;

/// Which playback backend a step runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Live output selection and any volume 0..100.
    Continuous,
    /// Pre-authored shortcuts bound to room+volume or room+playlist pairs.
    Discrete,
}

impl BackendKind {
    /// Canonical token stored in documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Discrete => "discrete",
        }
    }

    /// Parse a stored backend token. A blank token means "not set".
    ///
    /// `airplay` and `native` are accepted as synonyms of `continuous` and
    /// `discrete`; matching is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStateError::UnknownBackend`] for any other token.
    pub fn parse_token(token: &str) -> Result<Option<Self>, ConfigStateError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        token.parse().map(Some)
    }

    /// Backend a step actually runs on: blank tokens mean continuous.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStateError::UnknownBackend`] for unrecognised tokens.
    pub fn effective(token: &str) -> Result<Self, ConfigStateError> {
        Ok(Self::parse_token(token)?.unwrap_or(Self::Continuous))
    }
}

impl FromStr for BackendKind {
    type Err = ConfigStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" | "airplay" => Ok(Self::Continuous),
            "discrete" | "native" => Ok(Self::Discrete),
            _ => Err(ConfigStateError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
