//! osascript adapter error types.

use roomcast_domain::error::RoomcastError;

/// Errors specific to the osascript adapter.
#[derive(Debug, thiserror::Error)]
pub enum OsascriptError {
    /// The helper program could not be started.
    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The helper program exited unsuccessfully.
    #[error("{program} exited with {}: {stderr}", exit_description(*.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_description(code: Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |code| format!("status {code}"))
}

impl From<OsascriptError> for RoomcastError {
    fn from(err: OsascriptError) -> Self {
        RoomcastError::backend(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_exit_status_and_stderr() {
        let err = OsascriptError::Failed {
            program: "osascript".to_string(),
            code: Some(1),
            stderr: "Music got an error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "osascript exited with status 1: Music got an error"
        );
    }

    #[test]
    fn should_describe_signal_termination() {
        let err = OsascriptError::Failed {
            program: "shortcuts".to_string(),
            code: None,
            stderr: "killed".to_string(),
        };
        assert_eq!(err.to_string(), "shortcuts exited with signal: killed");
    }

    #[test]
    fn should_convert_to_backend_error() {
        let err: RoomcastError = OsascriptError::Failed {
            program: "shortcuts".to_string(),
            code: None,
            stderr: String::new(),
        }
        .into();
        assert!(matches!(err, RoomcastError::Backend(_)));
    }
}
