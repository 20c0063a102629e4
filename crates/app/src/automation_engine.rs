//! Automation engine — runs a document's steps in order and reports on them.
//!
//! The engine resolves the effective defaults once, then executes each step
//! through the [`StepExecutor`]. The first failing step stops the run: every
//! later step is recorded as skipped and never reaches the backend. A fired
//! cancellation token fails the next step with [`RoomcastError::Cancelled`]
//! before it touches the backend.

use roomcast_domain::automation::{AutomationDocument, RunReport, StepResult};
use roomcast_domain::config::ConfigDocument;
use roomcast_domain::defaults::{self, Defaults};
use roomcast_domain::error::RoomcastError;
use roomcast_domain::id::RunId;
use roomcast_domain::time;

use crate::ports::PlaybackBackend;
use crate::step_executor::{StepExecutor, resolve_step};

/// Outcome of [`AutomationEngine::run`].
///
/// The report is always complete. `failure` carries the error of the step
/// that stopped the run, if any.
#[derive(Debug)]
pub struct AutomationRun {
    pub report: RunReport,
    pub failure: Option<RoomcastError>,
}

impl AutomationRun {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

/// Fail-fast automation runner.
pub struct AutomationEngine<B> {
    executor: StepExecutor<B>,
}

impl<B: PlaybackBackend> AutomationEngine<B> {
    /// Create a new engine.
    pub fn new(executor: StepExecutor<B>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &StepExecutor<B> {
        &self.executor
    }

    /// Execute every step of `document` in order.
    ///
    /// # Errors
    ///
    /// Only structural problems with the document itself are returned as
    /// errors. Step failures end up in [`AutomationRun::failure`].
    #[tracing::instrument(skip_all, fields(name = document.name.as_deref().unwrap_or_default()))]
    pub async fn run(
        &self,
        document: &AutomationDocument,
        config: Option<&ConfigDocument>,
    ) -> Result<AutomationRun, RoomcastError> {
        document.validate()?;

        let run_id = RunId::new();
        let defaults = effective_defaults(document, config);
        tracing::info!(%run_id, steps = document.steps.len(), "starting automation");

        let mut steps = Vec::with_capacity(document.steps.len());
        let mut failure = None;

        for (index, step) in document.steps.iter().enumerate() {
            let resolved = resolve_step(step, &defaults);
            if failure.is_some() {
                steps.push(StepResult::skipped(index, step, resolved));
                continue;
            }

            tracing::info!(index, step = %step, "running step");
            let started_at = time::now();
            let clock = tokio::time::Instant::now();
            let outcome = if self.executor.is_cancelled() {
                Err(RoomcastError::Cancelled)
            } else {
                self.executor.execute(step, &defaults, config).await
            };
            let duration_ms = time::duration_ms(clock.elapsed());

            match outcome {
                Ok(()) => {
                    tracing::info!(index, step = %step, duration_ms, "step completed");
                    steps.push(StepResult::succeeded(
                        index,
                        step,
                        resolved,
                        started_at,
                        duration_ms,
                    ));
                }
                Err(err) => {
                    tracing::warn!(index, step = %step, error = %err, "step failed");
                    steps.push(StepResult::failed(
                        index,
                        step,
                        resolved,
                        started_at,
                        duration_ms,
                        err.to_string(),
                    ));
                    failure = Some(err);
                }
            }
        }

        let report = RunReport {
            run_id,
            dry_run: false,
            ok: failure.is_none(),
            defaults,
            steps,
        };
        if failure.is_some() {
            tracing::warn!(%run_id, skipped = report.skipped_count(), "automation stopped early");
        } else {
            tracing::info!(%run_id, "automation completed");
        }
        Ok(AutomationRun { report, failure })
    }

    /// Preview `document` without executing anything.
    ///
    /// # Errors
    ///
    /// Same as [`plan`].
    pub fn plan(
        &self,
        document: &AutomationDocument,
        config: Option<&ConfigDocument>,
    ) -> Result<RunReport, RoomcastError> {
        plan(document, config)
    }
}

/// Resolve every step of `document` against the effective defaults.
///
/// # Errors
///
/// Returns a validation error when the document has no steps.
pub fn plan(
    document: &AutomationDocument,
    config: Option<&ConfigDocument>,
) -> Result<RunReport, RoomcastError> {
    document.validate()?;

    let defaults = effective_defaults(document, config);
    let steps = document
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| StepResult::planned(index, step, resolve_step(step, &defaults)))
        .collect();

    Ok(RunReport {
        run_id: RunId::new(),
        dry_run: true,
        ok: true,
        defaults,
        steps,
    })
}

fn effective_defaults(document: &AutomationDocument, config: Option<&ConfigDocument>) -> Defaults {
    defaults::resolve(
        config.map(|config| &config.defaults),
        document.defaults.as_ref(),
    )
}
