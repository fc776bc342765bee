//! Periodic sweep of stale cart lines.
//!
//! Cart handlers already purge lazily before every read, which is what
//! keeps availability computations honest; this sweep additionally keeps
//! the table from accumulating abandoned reservations between requests.
//! Runs on a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use storefront_core::cart;
use storefront_db::repositories::CartItemRepo;

/// How often the sweep runs by default (seconds).
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 600;

/// Run the cart expiry sweep loop.
///
/// Deletes cart lines older than the reservation TTL. The cadence can be
/// tuned via `CART_EXPIRY_SWEEP_SECS`. Runs until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let sweep_secs: u64 = std::env::var("CART_EXPIRY_SWEEP_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

    tracing::info!(
        ttl_hours = cart::CART_LINE_TTL_HOURS,
        interval_secs = sweep_secs,
        "Cart expiry sweep started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(sweep_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Cart expiry sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = cart::staleness_cutoff(Utc::now());
                match CartItemRepo::purge_stale(&pool, cutoff).await {
                    Ok(purged) => {
                        if purged > 0 {
                            tracing::info!(purged, "Cart expiry sweep: purged stale lines");
                        } else {
                            tracing::debug!("Cart expiry sweep: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Cart expiry sweep failed");
                    }
                }
            }
        }
    }
}
