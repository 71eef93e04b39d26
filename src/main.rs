//! Demo plant: bootstraps the initial crew, adds one more of everything, lets the
//! simulation run for a while and prints the plant log.

use blast_furnace::config::SimConfig;
use blast_furnace::lifecycle::{setup_tracing, Coordinator, CoordinatorError};
use std::time::Duration;
use tracing::{info, Instrument};

const DEMO_DURATION: Duration = Duration::from_secs(20);

#[tokio::main]
async fn main() -> Result<(), CoordinatorError> {
    setup_tracing();

    info!("Starting plant");
    let plant = Coordinator::bootstrap(SimConfig::default());

    let span = tracing::info_span!("commissioning");
    async {
        plant.commission_furnace().await?;
        plant.hire_worker().await?;
        plant.commission_loader().await?;
        Ok::<_, CoordinatorError>(())
    }
    .instrument(span)
    .await?;

    tokio::time::sleep(DEMO_DURATION).await;

    for furnace in plant.furnaces() {
        info!(%furnace, "Final state");
    }
    for worker in plant.workers() {
        info!(%worker, "Final state");
    }

    let log = plant.shutdown().await?;
    for entry in &log {
        println!("{entry}");
    }

    info!(entries = log.len(), "Simulation completed");
    Ok(())
}
