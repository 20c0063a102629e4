//! Run reports — one [`StepResult`] per input step, always.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::automation::Step;
use crate::defaults::Defaults;
use crate::id::RunId;
use crate::time::Timestamp;

/// Error text attached to steps that never ran because an earlier one failed.
pub const SKIPPED_MESSAGE: &str = "skipped due to previous step failure";

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub index: usize,
    pub kind: String,
    pub input: Step,
    /// Preview of the parameters the step runs with after defaults apply.
    pub resolved: Map<String, Value>,
    pub ok: bool,
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    pub duration_ms: i64,
}

impl StepResult {
    fn new(index: usize, step: &Step, resolved: Map<String, Value>) -> Self {
        Self {
            index,
            kind: step.kind().to_string(),
            input: step.clone(),
            resolved,
            ok: false,
            skipped: false,
            error: None,
            started_at: None,
            duration_ms: 0,
        }
    }

    /// A step that ran to completion.
    #[must_use]
    pub fn succeeded(
        index: usize,
        step: &Step,
        resolved: Map<String, Value>,
        started_at: Timestamp,
        duration_ms: i64,
    ) -> Self {
        Self {
            ok: true,
            started_at: Some(started_at),
            duration_ms,
            ..Self::new(index, step, resolved)
        }
    }

    /// A step that ran and failed with `error`.
    #[must_use]
    pub fn failed(
        index: usize,
        step: &Step,
        resolved: Map<String, Value>,
        started_at: Timestamp,
        duration_ms: i64,
        error: String,
    ) -> Self {
        Self {
            error: Some(error),
            started_at: Some(started_at),
            duration_ms,
            ..Self::new(index, step, resolved)
        }
    }

    /// A step that never ran because an earlier step failed.
    #[must_use]
    pub fn skipped(index: usize, step: &Step, resolved: Map<String, Value>) -> Self {
        Self {
            skipped: true,
            error: Some(SKIPPED_MESSAGE.to_string()),
            ..Self::new(index, step, resolved)
        }
    }

    /// A step previewed by a dry run.
    #[must_use]
    pub fn planned(index: usize, step: &Step, resolved: Map<String, Value>) -> Self {
        Self {
            ok: true,
            ..Self::new(index, step, resolved)
        }
    }
}

/// Ordered results of a run (or a dry-run plan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: RunId,
    pub dry_run: bool,
    pub ok: bool,
    /// Effective defaults the steps were resolved against.
    pub defaults: Defaults,
    pub steps: Vec<StepResult>,
}

impl RunReport {
    /// The step that stopped the run, if any.
    #[must_use]
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|step| !step.ok && !step.skipped)
    }

    /// Number of steps that never ran.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.steps.iter().filter(|step| step.skipped).count()
    }
}
