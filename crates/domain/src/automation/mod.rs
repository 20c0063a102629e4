//! Automation — an ordered list of steps plus optional defaults.
//!
//! An [`AutomationDocument`] is parsed once and then only read. Steps run
//! strictly in order; each one inherits whatever it leaves unset from the
//! effective [`Defaults`].

mod report;
mod step;

pub use report::{RunReport, SKIPPED_MESSAGE, StepResult};
pub use step::Step;

use serde::{Deserialize, Serialize};

use crate::defaults::Defaults;
use crate::error::{RoomcastError, ValidationError};

/// A parsed automation script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<Defaults>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl AutomationDocument {
    /// Create a builder for constructing an [`AutomationDocument`].
    #[must_use]
    pub fn builder() -> AutomationDocumentBuilder {
        AutomationDocumentBuilder::default()
    }

    /// Check structural invariants. Step contents are checked when they run.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoSteps`] when `steps` is empty.
    pub fn validate(&self) -> Result<(), RoomcastError> {
        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`AutomationDocument`].
#[derive(Debug, Default)]
pub struct AutomationDocumentBuilder {
    name: Option<String>,
    defaults: Option<Defaults>,
    steps: Vec<Step>,
}

impl AutomationDocumentBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationDocument`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoSteps`] if no step was added.
    pub fn build(self) -> Result<AutomationDocument, RoomcastError> {
        let document = AutomationDocument {
            name: self.name,
            defaults: self.defaults,
            steps: self.steps,
        };
        document.validate()?;
        Ok(document)
    }
}
