//! Reading automation documents from files or stdin.

use std::path::Path;

use anyhow::Context;
use roomcast_domain::automation::AutomationDocument;
use tokio::io::AsyncReadExt;

/// Source format of an automation document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(source: &str) -> Self {
        let is_toml = Path::new(source)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml { Self::Toml } else { Self::Json }
    }
}

/// Read the document at `source`, `-` meaning stdin.
///
/// Files ending in `.toml` are parsed as TOML, everything else as JSON.
pub async fn read(source: &str) -> anyhow::Result<AutomationDocument> {
    let raw = if source == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("failed to read automation from stdin")?;
        raw
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("failed to read automation file {source}"))?
    };
    parse(source, &raw)
}

fn parse(source: &str, raw: &str) -> anyhow::Result<AutomationDocument> {
    let document = match Format::of(source) {
        Format::Toml => toml::from_str(raw)
            .with_context(|| format!("invalid TOML automation in {source}"))?,
        Format::Json => serde_json::from_str(raw)
            .with_context(|| format!("invalid JSON automation in {source}"))?,
    };
    Ok(document)
}

#[cfg(test)]
mod tests {
    use roomcast_domain::automation::Step;

    use super::*;

    #[test]
    fn should_pick_format_from_extension() {
        assert_eq!(Format::of("evening.toml"), Format::Toml);
        assert_eq!(Format::of("EVENING.TOML"), Format::Toml);
        assert_eq!(Format::of("evening.json"), Format::Json);
        assert_eq!(Format::of("-"), Format::Json);
    }

    #[test]
    fn should_parse_toml_automation() {
        let raw = r#"
            name = "evening"

            [defaults]
            rooms = ["Kitchen"]
            volume = 30

            [[steps]]
            type = "play"
            query = "Evening Jazz"

            [[steps]]
            type = "wait"
            state = "playing"
            timeout = "10s"
        "#;
        let document = parse("evening.toml", raw).unwrap();
        assert_eq!(document.defaults.unwrap().volume, Some(30));
        assert_eq!(document.steps.len(), 2);
        assert_eq!(
            document.steps[1],
            Step::Wait {
                state: Some("playing".to_string()),
                timeout: Some("10s".to_string()),
            }
        );
    }

    #[test]
    fn should_parse_json_automation() {
        let raw = r#"{"steps": [{"type": "transport", "action": "stop"}]}"#;
        let document = parse("-", raw).unwrap();
        assert_eq!(document.steps[0].kind(), "transport");
    }

    #[test]
    fn should_name_source_in_parse_errors() {
        let err = parse("broken.json", "{").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[tokio::test]
    async fn should_read_automation_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.json");
        std::fs::write(&path, r#"{"steps": [{"type": "transport", "action": "stop"}]}"#).unwrap();

        let document = read(path.to_str().unwrap()).await.unwrap();

        assert_eq!(document.steps.len(), 1);
    }
}
