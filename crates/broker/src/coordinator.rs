//! Coordinator that drives the adventure booking saga.

use crate::adventure::{Adventure, AdventureId};
use crate::broker::Broker;
use crate::error::{BrokerError, Result};
use crate::events::AdventureEvent;
use crate::services::{ActivityService, BankService, HotelService, RoomType};
use crate::state::Step;

/// Books adventures by calling the bank, the hotel and the activity
/// provider, in that order.
///
/// Each step runs only after the previous one returned a confirmation, and
/// the first failure ends the process. Steps that already committed are not
/// undone: a failed room reservation leaves the payment taken, and a failed
/// activity reservation leaves both the payment and the room in place. The
/// adventure's confirmations show the caller exactly how far it got.
pub struct AdventureCoordinator<B, H, A>
where
    B: BankService,
    H: HotelService,
    A: ActivityService,
{
    bank: B,
    hotel: H,
    activity: A,
}

impl<B, H, A> AdventureCoordinator<B, H, A>
where
    B: BankService,
    H: HotelService,
    A: ActivityService,
{
    /// Creates a new adventure coordinator.
    pub fn new(bank: B, hotel: H, activity: A) -> Self {
        Self {
            bank,
            hotel,
            activity,
        }
    }

    /// Runs the booking process for an adventure owned by `broker`.
    ///
    /// On failure the error is the one the failing service returned, and the
    /// adventure keeps the confirmations of the steps before it. An adventure
    /// can be processed only once.
    #[tracing::instrument(skip(self, broker), fields(broker = %broker.code()))]
    pub async fn process(&self, broker: &Broker, adventure_id: AdventureId) -> Result<()> {
        metrics::counter!("adventure_process_total").increment(1);
        let process_start = std::time::Instant::now();

        let result = self.run_steps(broker, adventure_id).await;

        let duration = process_start.elapsed().as_secs_f64();
        metrics::histogram!("adventure_process_duration_seconds").record(duration);

        match &result {
            Ok(()) => {
                metrics::counter!("adventure_completed").increment(1);
                tracing::info!(%adventure_id, duration, "adventure booked");
            }
            Err(err) => {
                if let Some(step) = err.failed_step() {
                    metrics::counter!("adventure_failed", "step" => step.as_str()).increment(1);
                }
                tracing::warn!(%adventure_id, error = %err, "adventure process stopped");
            }
        }

        result
    }

    async fn run_steps(&self, broker: &Broker, adventure_id: AdventureId) -> Result<()> {
        // 1. Payment
        let adventure = self.start(broker, adventure_id, Step::Payment).await?;
        let outcome = self
            .bank
            .process_payment(adventure.iban(), adventure.amount())
            .await;
        self.finish(broker, adventure_id, Step::Payment, outcome)
            .await?;

        // 2. Room
        let adventure = self.start(broker, adventure_id, Step::Room).await?;
        let outcome = self
            .hotel
            .reserve_room(RoomType::Single, adventure.begin(), adventure.end())
            .await;
        self.finish(broker, adventure_id, Step::Room, outcome).await?;

        // 3. Activity
        let adventure = self.start(broker, adventure_id, Step::Activity).await?;
        let outcome = self
            .activity
            .reserve_activity(adventure.begin(), adventure.end(), adventure.participants())
            .await;
        self.finish(broker, adventure_id, Step::Activity, outcome)
            .await
    }

    /// Moves the adventure into the step's pending state and returns the
    /// parameters the remote call needs.
    async fn start(
        &self,
        broker: &Broker,
        adventure_id: AdventureId,
        step: Step,
    ) -> Result<Adventure> {
        let adventure = broker
            .record(adventure_id, AdventureEvent::step_started(step))
            .await?;
        tracing::info!(step = step.as_str(), "adventure step started");
        Ok(adventure)
    }

    /// Records the outcome of a remote call.
    ///
    /// A service error is returned to the caller unchanged, even if the
    /// adventure could no longer be updated. A confirmation that cannot be
    /// recorded is logged with its reference before the record error is
    /// returned.
    async fn finish<E>(
        &self,
        broker: &Broker,
        adventure_id: AdventureId,
        step: Step,
        outcome: std::result::Result<String, E>,
    ) -> Result<()>
    where
        E: Into<BrokerError>,
    {
        let err: BrokerError = match outcome {
            Ok(reference) if !reference.is_empty() => {
                let recorded = broker
                    .record(
                        adventure_id,
                        AdventureEvent::step_completed(step, reference.as_str()),
                    )
                    .await;
                if let Err(record_err) = recorded {
                    tracing::warn!(
                        step = step.as_str(),
                        %reference,
                        error = %record_err,
                        "step committed remotely but could not be recorded"
                    );
                    return Err(record_err);
                }
                tracing::info!(step = step.as_str(), %reference, "adventure step completed");
                return Ok(());
            }
            Ok(_) => BrokerError::EmptyConfirmation { step },
            Err(e) => e.into(),
        };

        if let Err(record_err) = broker
            .record(adventure_id, AdventureEvent::step_failed(step, err.to_string()))
            .await
        {
            tracing::error!(
                step = step.as_str(),
                error = %record_err,
                "could not record step failure"
            );
        }
        tracing::warn!(step = step.as_str(), error = %err, "adventure step failed");

        Err(err)
    }
}
