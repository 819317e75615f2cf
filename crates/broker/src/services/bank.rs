//! Bank capability and in-memory implementation.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::BankError;
use crate::services::{CallLog, ServiceCall};

/// Trait for charging a client's account.
#[async_trait]
pub trait BankService: Send + Sync {
    /// Charges `amount` to the account identified by `iban` and returns the
    /// bank's payment confirmation.
    async fn process_payment(&self, iban: &str, amount: u64) -> Result<String, BankError>;
}

#[derive(Debug, Default)]
struct InMemoryBankState {
    /// Every payment taken, as (confirmation, iban, amount).
    payments: Vec<(String, String, u64)>,
    next_id: u32,
    confirmation: Option<String>,
    failure: Option<BankError>,
}

/// In-memory bank for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBankService {
    state: Arc<RwLock<InMemoryBankState>>,
    calls: CallLog,
}

impl InMemoryBankService {
    /// Creates a new in-memory bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls into the given log instead of a private one.
    pub fn with_call_log(mut self, calls: CallLog) -> Self {
        self.calls = calls;
        self
    }

    /// Answers every payment with this confirmation.
    pub fn respond_with(&self, confirmation: impl Into<String>) {
        self.write().confirmation = Some(confirmation.into());
    }

    /// Fails every payment with this error until [`clear_failure`](Self::clear_failure).
    pub fn fail_with(&self, error: BankError) {
        self.write().failure = Some(error);
    }

    /// Stops injecting failures.
    pub fn clear_failure(&self) {
        self.write().failure = None;
    }

    /// Returns the number of payments taken.
    pub fn payment_count(&self) -> usize {
        self.read().payments.len()
    }

    /// Returns the account and amount of every charge answered with
    /// `confirmation`, oldest first.
    pub fn payments(&self, confirmation: &str) -> Vec<(String, u64)> {
        self.read()
            .payments
            .iter()
            .filter(|(c, _, _)| c == confirmation)
            .map(|(_, iban, amount)| (iban.clone(), *amount))
            .collect()
    }

    /// Returns the call log this bank writes to.
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InMemoryBankState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryBankState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BankService for InMemoryBankService {
    async fn process_payment(&self, iban: &str, amount: u64) -> Result<String, BankError> {
        self.calls.record(ServiceCall::ProcessPayment {
            iban: iban.to_string(),
            amount,
        });

        let mut state = self.write();

        if let Some(error) = &state.failure {
            return Err(error.clone());
        }

        state.next_id += 1;
        let confirmation = state
            .confirmation
            .clone()
            .unwrap_or_else(|| format!("PAY-{:04}", state.next_id));
        state
            .payments
            .push((confirmation.clone(), iban.to_string(), amount));

        Ok(confirmation)
    }
}
