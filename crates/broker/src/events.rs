//! Events recorded while an adventure is processed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::Step;

/// Facts recorded on an adventure as the coordinator drives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AdventureEvent {
    /// A step's remote call is about to be made.
    StepStarted(StepStartedData),

    /// A step's remote call returned a confirmation.
    StepCompleted(StepCompletedData),

    /// A step's remote call failed.
    StepFailed(StepFailedData),
}

/// Data for StepStarted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStartedData {
    pub step: Step,
    pub started_at: DateTime<Utc>,
}

/// Data for StepCompleted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCompletedData {
    pub step: Step,
    /// Confirmation reference issued by the remote service.
    pub reference: String,
    pub completed_at: DateTime<Utc>,
}

/// Data for StepFailed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailedData {
    pub step: Step,
    /// Error message describing the failure.
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

impl AdventureEvent {
    /// Creates a StepStarted event.
    pub fn step_started(step: Step) -> Self {
        AdventureEvent::StepStarted(StepStartedData {
            step,
            started_at: Utc::now(),
        })
    }

    /// Creates a StepCompleted event.
    pub fn step_completed(step: Step, reference: impl Into<String>) -> Self {
        AdventureEvent::StepCompleted(StepCompletedData {
            step,
            reference: reference.into(),
            completed_at: Utc::now(),
        })
    }

    /// Creates a StepFailed event.
    pub fn step_failed(step: Step, error: impl Into<String>) -> Self {
        AdventureEvent::StepFailed(StepFailedData {
            step,
            error: error.into(),
            failed_at: Utc::now(),
        })
    }

    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            AdventureEvent::StepStarted(_) => "StepStarted",
            AdventureEvent::StepCompleted(_) => "StepCompleted",
            AdventureEvent::StepFailed(_) => "StepFailed",
        }
    }

    /// Returns the step the event is about.
    pub fn step(&self) -> Step {
        match self {
            AdventureEvent::StepStarted(data) => data.step,
            AdventureEvent::StepCompleted(data) => data.step,
            AdventureEvent::StepFailed(data) => data.step,
        }
    }
}
