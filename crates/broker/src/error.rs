//! Broker error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::adventure::AdventureId;
use crate::state::{AdventureState, Step};

/// Failures reported by the bank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// The account cannot cover the amount.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// The account does not exist at this bank.
    #[error("Invalid account")]
    InvalidAccount,

    /// The bank could not be reached or refused to answer.
    #[error("Bank unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported by the hotel system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotelError {
    /// No room of the requested type is free for the dates.
    #[error("No vacancy")]
    NoVacancy,

    /// The hotel rejected the requested dates.
    #[error("Invalid dates")]
    InvalidDates,

    /// The hotel could not be reached or refused to answer.
    #[error("Hotel unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported by the activity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    /// No offer has room for the participants on the dates.
    #[error("No availability")]
    NoAvailability,

    /// The provider rejected the dates or participant count.
    #[error("Invalid parameters")]
    InvalidParameters,

    /// The provider could not be reached or refused to answer.
    #[error("Activity provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by the adventure record itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdventureError {
    /// The begin date does not strictly precede the end date.
    #[error("Invalid date range: {begin} is not before {end}")]
    InvalidDateRange { begin: NaiveDate, end: NaiveDate },

    /// An adventure needs at least one participant.
    #[error("Invalid number of participants: {0}")]
    InvalidParticipants(u32),

    /// The payer account identifier is blank.
    #[error("Invalid account identifier: {0:?}")]
    InvalidAccount(String),

    /// Nothing to charge.
    #[error("Invalid amount: {0} (must be greater than 0)")]
    InvalidAmount(u64),

    /// The step cannot be recorded from the current state.
    #[error("Invalid transition: cannot {action} {step} from {state} state")]
    InvalidTransition {
        state: AdventureState,
        step: Step,
        action: &'static str,
    },

    /// The adventure was already processed once.
    #[error("Adventure already processed (state {0})")]
    AlreadyProcessed(AdventureState),
}

/// Errors that can occur during broker operations.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The broker code is blank.
    #[error("Invalid broker code: {0:?}")]
    InvalidCode(String),

    /// The broker name is blank.
    #[error("Invalid broker name: {0:?}")]
    InvalidName(String),

    /// No adventure with this ID belongs to the broker.
    #[error("Adventure not found: {0}")]
    AdventureNotFound(AdventureId),

    /// The adventure record rejected an operation.
    #[error("Adventure error: {0}")]
    Adventure(#[from] AdventureError),

    /// The payment step failed.
    #[error(transparent)]
    Bank(#[from] BankError),

    /// The room reservation step failed.
    #[error(transparent)]
    Hotel(#[from] HotelError),

    /// The activity reservation step failed.
    #[error(transparent)]
    Activity(#[from] ActivityError),

    /// A service reported success without a confirmation reference.
    ///
    /// The step is recorded as failed and its result stays unset, although
    /// the remote effect may have committed. Reconciling it is left to the
    /// caller.
    #[error("Empty confirmation returned by {step} step")]
    EmptyConfirmation { step: Step },
}

impl BrokerError {
    /// Returns the saga step this error came from, if it is a step failure.
    pub fn failed_step(&self) -> Option<Step> {
        match self {
            BrokerError::Bank(_) => Some(Step::Payment),
            BrokerError::Hotel(_) => Some(Step::Room),
            BrokerError::Activity(_) => Some(Step::Activity),
            BrokerError::EmptyConfirmation { step } => Some(*step),
            _ => None,
        }
    }
}

/// Convenience type alias for broker results.
pub type Result<T> = std::result::Result<T, BrokerError>;
