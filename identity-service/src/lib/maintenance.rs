use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::identity::ports::CredentialServicePort;

/// Spawn the task deleting refresh tokens that outlived the refresh lifetime.
///
/// Returns `None` when `interval` is zero. Sweep failures are logged and the
/// task keeps running.
pub fn spawn_refresh_token_sweeper(
    credential_service: Arc<dyn CredentialServicePort>,
    interval: Duration,
) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        tracing::info!("Refresh token sweeper disabled");
        return None;
    }

    tracing::info!(
        interval_secs = interval.as_secs(),
        "Refresh token sweeper started"
    );

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match credential_service.purge_expired_refresh_tokens().await {
                Ok(0) => tracing::debug!("No expired refresh tokens"),
                Ok(deleted) => tracing::info!(deleted, "Expired refresh tokens purged"),
                Err(e) => tracing::warn!(error = %e, "Refresh token sweep failed"),
            }
        }
    }))
}
