//! Values read from configuration paths, and token coercion helpers.

use std::fmt;

use serde::Serialize;

use crate::volume::Volume;

/// A value read back from a configuration path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Bool(bool),
    Volume(Volume),
    List(Vec<String>),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Bool(value) => value.fmt(f),
            Self::Volume(volume) => volume.fmt(f),
            Self::List(items) => f.write_str(&items.join("\n")),
        }
    }
}

/// Parse a boolean token: `1/true/yes/on` or `0/false/no/off`,
/// case-insensitive and trimmed.
#[must_use]
pub fn parse_bool(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Whether `token` is the literal `null` used to clear optional fields.
pub(crate) fn is_null(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case("null")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_boolean_token_sets() {
        for token in ["1", "true", "YES", " On "] {
            assert_eq!(parse_bool(token), Some(true), "token {token:?}");
        }
        for token in ["0", "False", "no", "OFF"] {
            assert_eq!(parse_bool(token), Some(false), "token {token:?}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn should_recognise_null_case_insensitively() {
        assert!(is_null("null"));
        assert!(is_null(" NULL "));
        assert!(!is_null("nil"));
    }

    #[test]
    fn should_serialize_untagged() {
        assert_eq!(
            serde_json::to_value(ConfigValue::Volume(Volume::new(30).unwrap())).unwrap(),
            serde_json::json!(30)
        );
        assert_eq!(
            serde_json::to_value(ConfigValue::List(vec!["A".to_string()])).unwrap(),
            serde_json::json!(["A"])
        );
    }
}
