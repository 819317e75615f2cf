//! Activity provider capability and in-memory implementation.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ActivityError;
use crate::services::{CallLog, ServiceCall};

/// Trait for activity reservations.
#[async_trait]
pub trait ActivityService: Send + Sync {
    /// Reserves an activity between `begin` and `end` for `participants`
    /// people and returns the provider's booking reference.
    async fn reserve_activity(
        &self,
        begin: NaiveDate,
        end: NaiveDate,
        participants: u32,
    ) -> Result<String, ActivityError>;
}

#[derive(Debug, Default)]
struct InMemoryActivityState {
    /// Every slot held, as (reference, begin, end, participants).
    bookings: Vec<(String, NaiveDate, NaiveDate, u32)>,
    next_id: u32,
    reference: Option<String>,
    failure: Option<ActivityError>,
}

/// In-memory activity provider for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityService {
    state: Arc<RwLock<InMemoryActivityState>>,
    calls: CallLog,
}

impl InMemoryActivityService {
    /// Creates a new in-memory activity provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls into the given log instead of a private one.
    pub fn with_call_log(mut self, calls: CallLog) -> Self {
        self.calls = calls;
        self
    }

    /// Answers every reservation with this reference.
    pub fn respond_with(&self, reference: impl Into<String>) {
        self.write().reference = Some(reference.into());
    }

    /// Fails every reservation with this error until cleared.
    pub fn fail_with(&self, error: ActivityError) {
        self.write().failure = Some(error);
    }

    /// Stops injecting failures.
    pub fn clear_failure(&self) {
        self.write().failure = None;
    }

    /// Returns the number of activity slots held.
    pub fn booking_count(&self) -> usize {
        self.read().bookings.len()
    }

    /// Returns the dates and participant count of every booking answered
    /// with `reference`, oldest first.
    pub fn bookings(&self, reference: &str) -> Vec<(NaiveDate, NaiveDate, u32)> {
        self.read()
            .bookings
            .iter()
            .filter(|(r, _, _, _)| r == reference)
            .map(|(_, begin, end, participants)| (*begin, *end, *participants))
            .collect()
    }

    /// Returns the call log this provider writes to.
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InMemoryActivityState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryActivityState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ActivityService for InMemoryActivityService {
    async fn reserve_activity(
        &self,
        begin: NaiveDate,
        end: NaiveDate,
        participants: u32,
    ) -> Result<String, ActivityError> {
        self.calls.record(ServiceCall::ReserveActivity {
            begin,
            end,
            participants,
        });

        let mut state = self.write();

        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        if participants == 0 || begin > end {
            return Err(ActivityError::InvalidParameters);
        }

        state.next_id += 1;
        let reference = state
            .reference
            .clone()
            .unwrap_or_else(|| format!("ACT-{:04}", state.next_id));
        state
            .bookings
            .push((reference.clone(), begin, end, participants));

        Ok(reference)
    }
}
