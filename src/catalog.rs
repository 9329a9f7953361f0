//! Token-catalog polling.
//!
//! Fetches the drippable-token list immediately on startup and then on a
//! fixed interval. Single-flight: the fetch is awaited inside the loop and
//! missed ticks are skipped, so a slow response delays the next fetch instead
//! of overlapping it. A failed fetch sends nothing; the app keeps whatever
//! catalog it already had.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;

use crate::api::FaucetClient;
use crate::error::ApiError;
use crate::types::{AppEvent, Token};

pub async fn run_catalog_poll(
    client: Arc<FaucetClient>,
    interval: Duration,
    tx: UnboundedSender<AppEvent>,
) {
    let client = &client;
    poll_loop(interval, move || client.fetch_tokens(), tx).await
}

/// The poll loop itself, generic over the fetch so tests can drive it with
/// fake clocks and canned responses.
pub async fn poll_loop<F, Fut>(interval: Duration, mut fetch: F, tx: UnboundedSender<AppEvent>)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<Token>, ApiError>>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        match fetch().await {
            Ok(tokens) => {
                log::debug!("[catalog] fetched {} tokens", tokens.len());
                if tx.send(AppEvent::CatalogReplaced(tokens)).is_err() {
                    return;
                }
            }
            Err(e) => {
                // Previous catalog stays; next tick retries.
                log::warn!("[catalog] poll failed: {e}");
            }
        }
    }
}
