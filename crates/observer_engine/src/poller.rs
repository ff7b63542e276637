use std::time::Duration;

use observer_logging::{observer_debug, observer_info, observer_warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, WorkerApi};

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub registry_interval: Duration,
    pub results_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            registry_interval: Duration::from_millis(2000),
            results_interval: Duration::from_millis(2000),
        }
    }
}

/// Fetches the session/user registry on every tick until cancelled.
///
/// A failed fetch skips the cycle; the next tick retries.
pub async fn poll_registry(
    api: &dyn WorkerApi,
    interval: Duration,
    sink: &dyn EventSink,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        match api.fetch_registry().await {
            Ok(listing) => sink.emit(EngineEvent::RegistryFetched(listing)),
            Err(err) => observer_warn!("Registry fetch failed, retrying next tick: {}", err),
        }
    }
    observer_info!("Registry poller stopped");
}

/// Fetches result events for `session_id` on every tick until cancelled.
///
/// Every record returned is forwarded, including ones already delivered
/// before; deduplication happens downstream.
pub async fn poll_results(
    api: &dyn WorkerApi,
    session_id: &str,
    interval: Duration,
    sink: &dyn EventSink,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        match api.fetch_results(session_id).await {
            Ok(records) => {
                observer_debug!("Fetched {} result records for {}", records.len(), session_id);
                for record in records {
                    sink.emit(EngineEvent::ResultArrived(record));
                }
            }
            Err(err) => observer_warn!("Result fetch failed, retrying next tick: {}", err),
        }
    }
    observer_info!("Result poller for session {} stopped", session_id);
}
