//! Adventure runner entry point.

use std::process::ExitCode;

use broker::AdventureState;
use runner::Config;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Book the adventure
    let outcome = runner::run(&config).await;
    tracing::debug!(metrics = %metrics_handle.render(), "process metrics");

    match outcome {
        Ok(adventure) => {
            tracing::info!(
                adventure_id = %adventure.id(),
                state = %adventure.state(),
                bank_payment = adventure.bank_payment().unwrap_or("-"),
                room_booking = adventure.room_booking().unwrap_or("-"),
                activity_booking = adventure.activity_booking().unwrap_or("-"),
                "adventure processed"
            );
            if adventure.state() == AdventureState::ActivityDone {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "adventure could not be set up");
            ExitCode::FAILURE
        }
    }
}
