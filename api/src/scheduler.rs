//! Periodic gateway token refresh job
//!
//! Fire-and-forget: the job runs independently of any in-flight send,
//! and a failed refresh only logs - the next send will fetch a token on
//! demand anyway.

use std::sync::Arc;

use log::{error, info};

use sf_infra::gateway::TokenManager;
use sf_shared::config::TokenRefreshConfig;

/// Spawn the background refresh loop
pub fn spawn_token_refresh(manager: Arc<TokenManager>, config: TokenRefreshConfig) {
    if !config.enabled {
        info!("Token refresh job disabled by configuration");
        return;
    }

    let period = std::time::Duration::from_secs(config.interval_secs.max(60));
    info!("Token refresh job running every {}s", period.as_secs());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately; skip it so startup does not
        // depend on the gateway being reachable.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match manager.refresh().await {
                Ok(_) => info!("Gateway token refreshed by the scheduler"),
                Err(err) => error!("Scheduled gateway token refresh failed: {err}"),
            }
        }
    });
}
