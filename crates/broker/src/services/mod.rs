//! Remote service capabilities used by the adventure saga, with in-memory
//! implementations for tests and local runs.

pub mod activity;
pub mod bank;
pub mod hotel;

use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;

use crate::state::Step;

pub use activity::{ActivityService, InMemoryActivityService};
pub use bank::{BankService, InMemoryBankService};
pub use hotel::{HotelService, InMemoryHotelService, RoomType};

/// A call made to one of the in-memory services, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    /// [`BankService::process_payment`].
    ProcessPayment {
        /// Account charged.
        iban: String,
        /// Amount charged.
        amount: u64,
    },

    /// [`HotelService::reserve_room`].
    ReserveRoom {
        /// Kind of room requested.
        room_type: RoomType,
        /// First night.
        arrival: NaiveDate,
        /// Day of departure.
        departure: NaiveDate,
    },

    /// [`ActivityService::reserve_activity`].
    ReserveActivity {
        /// First day of the activity.
        begin: NaiveDate,
        /// Last day of the activity.
        end: NaiveDate,
        /// Number of people booked.
        participants: u32,
    },
}

impl ServiceCall {
    /// Returns the saga step this call belongs to.
    pub fn step(&self) -> Step {
        match self {
            ServiceCall::ProcessPayment { .. } => Step::Payment,
            ServiceCall::ReserveRoom { .. } => Step::Room,
            ServiceCall::ReserveActivity { .. } => Step::Activity,
        }
    }
}

/// Ordered record of service calls.
///
/// Hand the same log to several in-memory services to observe the order in
/// which they were called.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<RwLock<Vec<ServiceCall>>>,
}

impl CallLog {
    /// Creates an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, call: ServiceCall) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Returns every recorded call in order.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the step of every recorded call in order.
    pub fn steps(&self) -> Vec<Step> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(ServiceCall::step)
            .collect()
    }

    /// Returns how many calls were made for the given step.
    pub fn count(&self, step: Step) -> usize {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|call| call.step() == step)
            .count()
    }

    /// Returns the total number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if no call was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every recorded call.
    pub fn clear(&self) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
