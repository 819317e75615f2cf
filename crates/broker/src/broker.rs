//! The broker: owner of booked adventures.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::adventure::{Adventure, AdventureId, AdventureRequest};
use crate::error::{BrokerError, Result};
use crate::events::AdventureEvent;

/// A travel broker and the adventures booked through it.
///
/// Cloning a broker yields another handle to the same adventure collection,
/// so it can be shared between concurrent callers. Nothing about a broker is
/// global: tests and runs that want isolation create their own, or call
/// [`clear_adventures`](Self::clear_adventures).
#[derive(Debug, Clone)]
pub struct Broker {
    code: String,
    name: String,
    adventures: Arc<RwLock<Vec<Adventure>>>,
}

impl Broker {
    /// Creates a broker with no adventures.
    ///
    /// Both the code and the name must contain a non-whitespace character.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let name = name.into();

        if code.trim().is_empty() {
            return Err(BrokerError::InvalidCode(code));
        }
        if name.trim().is_empty() {
            return Err(BrokerError::InvalidName(name));
        }

        Ok(Self {
            code,
            name,
            adventures: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Returns the broker code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the broker's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates the request and registers a new, unprocessed adventure.
    pub async fn create_adventure(&self, request: AdventureRequest) -> Result<AdventureId> {
        let adventure = Adventure::new(&self.code, request)?;
        let id = adventure.id();

        self.adventures.write().await.push(adventure);
        tracing::debug!(broker = %self.code, adventure_id = %id, "adventure registered");

        Ok(id)
    }

    /// Returns a snapshot of the adventure with the given ID.
    pub async fn adventure(&self, id: AdventureId) -> Option<Adventure> {
        self.adventures
            .read()
            .await
            .iter()
            .find(|adventure| adventure.id() == id)
            .cloned()
    }

    /// Returns snapshots of every adventure, in registration order.
    pub async fn adventures(&self) -> Vec<Adventure> {
        self.adventures.read().await.clone()
    }

    /// Returns the number of adventures owned by the broker.
    pub async fn adventure_count(&self) -> usize {
        self.adventures.read().await.len()
    }

    /// Removes every adventure owned by the broker.
    pub async fn clear_adventures(&self) {
        let mut adventures = self.adventures.write().await;
        let removed = adventures.len();
        adventures.clear();
        tracing::debug!(broker = %self.code, removed, "adventures cleared");
    }

    /// Records an event on an adventure and returns the updated snapshot.
    ///
    /// The lock is held only for the update itself.
    pub(crate) async fn record(&self, id: AdventureId, event: AdventureEvent) -> Result<Adventure> {
        let mut adventures = self.adventures.write().await;
        let adventure = adventures
            .iter_mut()
            .find(|adventure| adventure.id() == id)
            .ok_or(BrokerError::AdventureNotFound(id))?;

        adventure.record(event)?;
        Ok(adventure.clone())
    }
}
