//! Duration strings used by `wait` steps.
//!
//! Accepted forms: a bare integer (seconds), or one or more `<integer><unit>`
//! groups with units `ms`, `s`, `m` and `h`, e.g. `500ms`, `45s`, `1m30s`.

use std::time::Duration;

use crate::error::ValidationError;

/// Parse a duration string.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDuration`] for empty input, unknown
/// units, or a number without a unit inside a compound string.
pub fn parse_duration(input: &str) -> Result<Duration, ValidationError> {
    let invalid = || ValidationError::InvalidDuration(input.to_string());
    let text = input.trim();
    if text.is_empty() {
        return Err(invalid());
    }
    if let Ok(secs) = text.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = text;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
        if digits == 0 {
            return Err(invalid());
        }
        let amount: u64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let part = match &rest[..unit_len] {
            "ms" => Duration::from_millis(amount),
            "s" => Duration::from_secs(amount),
            "m" => Duration::from_secs(amount.saturating_mul(60)),
            "h" => Duration::from_secs(amount.saturating_mul(3600)),
            _ => return Err(invalid()),
        };
        total = total.saturating_add(part);
        rest = &rest[unit_len..];
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_bare_integer_as_seconds() {
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn should_parse_single_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn should_parse_compound_durations() {
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(
            parse_duration("1s500ms").unwrap(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn should_reject_malformed_durations() {
        for input in ["", "  ", "soon", "5x", "s5", "1m30", "-3s"] {
            assert_eq!(
                parse_duration(input),
                Err(ValidationError::InvalidDuration(input.to_string())),
                "input {input:?}"
            );
        }
    }
}
