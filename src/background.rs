use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::interval;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;

/// Periodically moves confirmed appointments whose end has passed to completed.
pub async fn start_completion_sweeper(state: Arc<AppState>, period: Duration) {
    info!("Starting completion sweeper (every {:?})...", period);

    let mut ticker = interval(period);
    loop {
        ticker.tick().await;

        let span = info_span!("completion_sweep");
        async {
            match state.lifecycle_service.complete_elapsed(Utc::now()).await {
                Ok(0) => {}
                Ok(count) => info!("Sweep completed {} appointments", count),
                Err(e) => error!("Completion sweep failed: {:?}", e),
            }
        }
            .instrument(span)
            .await;
    }
}
