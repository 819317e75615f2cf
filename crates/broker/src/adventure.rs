//! The adventure booking record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdventureError;
use crate::events::AdventureEvent;
use crate::state::{AdventureState, Step};

/// Identifies an adventure within its broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdventureId(Uuid);

impl AdventureId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for AdventureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for booking a new adventure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureRequest {
    /// First day of the adventure.
    pub begin: NaiveDate,
    /// Last day of the adventure, strictly after `begin`.
    pub end: NaiveDate,
    /// Number of people taking part in the activity.
    pub participants: u32,
    /// Account the adventure is charged to.
    pub iban: String,
    /// Amount to charge.
    pub amount: u64,
}

impl AdventureRequest {
    /// Creates a new adventure request.
    pub fn new(
        begin: NaiveDate,
        end: NaiveDate,
        participants: u32,
        iban: impl Into<String>,
        amount: u64,
    ) -> Self {
        Self {
            begin,
            end,
            participants,
            iban: iban.into(),
            amount,
        }
    }

    fn validate(&self) -> Result<(), AdventureError> {
        if self.begin >= self.end {
            return Err(AdventureError::InvalidDateRange {
                begin: self.begin,
                end: self.end,
            });
        }
        if self.participants == 0 {
            return Err(AdventureError::InvalidParticipants(self.participants));
        }
        if self.iban.trim().is_empty() {
            return Err(AdventureError::InvalidAccount(self.iban.clone()));
        }
        if self.amount == 0 {
            return Err(AdventureError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}

/// A booked adventure and the outcome of its booking process.
///
/// The three confirmation fields start out unset and are filled in, in
/// order, as the coordinator's remote calls succeed. A field is only ever
/// set once; a failed step leaves its field and every later one unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adventure {
    id: AdventureId,
    broker_code: String,
    begin: NaiveDate,
    end: NaiveDate,
    participants: u32,
    iban: String,
    amount: u64,
    state: AdventureState,
    /// Confirmation from the bank.
    bank_payment: Option<String>,
    /// Confirmation from the hotel.
    room_booking: Option<String>,
    /// Confirmation from the activity provider.
    activity_booking: Option<String>,
    history: Vec<AdventureEvent>,
}

impl Adventure {
    /// Validates the request and creates an unprocessed adventure for the
    /// broker with the given code.
    pub(crate) fn new(
        broker_code: impl Into<String>,
        request: AdventureRequest,
    ) -> Result<Self, AdventureError> {
        request.validate()?;

        Ok(Self {
            id: AdventureId::generate(),
            broker_code: broker_code.into(),
            begin: request.begin,
            end: request.end,
            participants: request.participants,
            iban: request.iban,
            amount: request.amount,
            state: AdventureState::NotStarted,
            bank_payment: None,
            room_booking: None,
            activity_booking: None,
            history: Vec::new(),
        })
    }

    /// Records an event, enforcing the step order and write-once results.
    pub(crate) fn record(&mut self, event: AdventureEvent) -> Result<(), AdventureError> {
        match &event {
            AdventureEvent::StepStarted(data) => {
                if !self.state.can_start(data.step) {
                    if data.step == Step::Payment {
                        return Err(AdventureError::AlreadyProcessed(self.state));
                    }
                    return Err(self.invalid(data.step, "start"));
                }
                self.state = AdventureState::pending(data.step);
            }
            AdventureEvent::StepCompleted(data) => {
                if self.state.pending_step() != Some(data.step) {
                    return Err(self.invalid(data.step, "complete"));
                }
                let slot = self.slot_mut(data.step);
                if slot.is_some() {
                    return Err(self.invalid(data.step, "complete"));
                }
                *slot = Some(data.reference.clone());
                self.state = AdventureState::done(data.step);
            }
            AdventureEvent::StepFailed(data) => {
                if self.state.pending_step() != Some(data.step) {
                    return Err(self.invalid(data.step, "fail"));
                }
                self.state = AdventureState::Failed(data.step);
            }
        }

        self.history.push(event);
        Ok(())
    }

    fn invalid(&self, step: Step, action: &'static str) -> AdventureError {
        AdventureError::InvalidTransition {
            state: self.state,
            step,
            action,
        }
    }

    fn slot_mut(&mut self, step: Step) -> &mut Option<String> {
        match step {
            Step::Payment => &mut self.bank_payment,
            Step::Room => &mut self.room_booking,
            Step::Activity => &mut self.activity_booking,
        }
    }
}

// Query methods
impl Adventure {
    /// Returns the adventure ID.
    pub fn id(&self) -> AdventureId {
        self.id
    }

    /// Returns the code of the broker that owns this adventure.
    pub fn broker_code(&self) -> &str {
        &self.broker_code
    }

    /// Returns the first day of the adventure.
    pub fn begin(&self) -> NaiveDate {
        self.begin
    }

    /// Returns the last day of the adventure.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns the number of participants.
    pub fn participants(&self) -> u32 {
        self.participants
    }

    /// Returns the account charged for the adventure.
    pub fn iban(&self) -> &str {
        &self.iban
    }

    /// Returns the amount charged for the adventure.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Returns the process state.
    pub fn state(&self) -> AdventureState {
        self.state
    }

    /// Returns the bank's payment confirmation, if the payment succeeded.
    pub fn bank_payment(&self) -> Option<&str> {
        self.bank_payment.as_deref()
    }

    /// Returns the hotel's room confirmation, if the reservation succeeded.
    pub fn room_booking(&self) -> Option<&str> {
        self.room_booking.as_deref()
    }

    /// Returns the activity confirmation, if the reservation succeeded.
    pub fn activity_booking(&self) -> Option<&str> {
        self.activity_booking.as_deref()
    }

    /// Returns the confirmation recorded for a step, if any.
    pub fn confirmation(&self, step: Step) -> Option<&str> {
        match step {
            Step::Payment => self.bank_payment(),
            Step::Room => self.room_booking(),
            Step::Activity => self.activity_booking(),
        }
    }

    /// Returns the steps that committed on their remote system, in order.
    pub fn completed_steps(&self) -> Vec<Step> {
        Step::ALL
            .into_iter()
            .filter(|step| self.confirmation(*step).is_some())
            .collect()
    }

    /// Returns every event recorded on this adventure.
    pub fn history(&self) -> &[AdventureEvent] {
        &self.history
    }
}
