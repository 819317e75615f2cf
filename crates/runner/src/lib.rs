//! Local runner for the adventure broker.
//!
//! Wires one broker, one adventure and in-memory bank, hotel and activity
//! services together and runs the booking process once.

pub mod config;

pub use config::Config;

use broker::{
    ActivityError, Adventure, AdventureCoordinator, BankError, Broker, BrokerError, HotelError,
    InMemoryActivityService, InMemoryBankService, InMemoryHotelService, Step,
};

const INJECTED: &str = "failure injected by FAIL_STEP";

/// Books the configured adventure and returns its final snapshot.
///
/// A failed booking step is logged and reflected in the snapshot's state;
/// only setup errors (invalid broker or adventure) are returned as errors.
pub async fn run(config: &Config) -> broker::Result<Adventure> {
    let bank = InMemoryBankService::new();
    let hotel = InMemoryHotelService::new();
    let activity = InMemoryActivityService::new();

    match config.fail_step {
        Some(Step::Payment) => bank.fail_with(BankError::Unavailable(INJECTED.to_string())),
        Some(Step::Room) => hotel.fail_with(HotelError::Unavailable(INJECTED.to_string())),
        Some(Step::Activity) => {
            activity.fail_with(ActivityError::Unavailable(INJECTED.to_string()))
        }
        None => {}
    }

    let broker = Broker::new(config.broker_code.clone(), config.broker_name.clone())?;
    let adventure_id = broker.create_adventure(config.adventure_request()).await?;
    tracing::info!(broker = %broker.code(), %adventure_id, "adventure created");

    let coordinator = AdventureCoordinator::new(bank, hotel, activity);
    if let Err(err) = coordinator.process(&broker, adventure_id).await {
        tracing::warn!(%adventure_id, error = %err, "booking did not complete");
    }

    broker
        .adventure(adventure_id)
        .await
        .ok_or(BrokerError::AdventureNotFound(adventure_id))
}
