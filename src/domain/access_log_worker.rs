//! Background worker that persists access events.
//!
//! Runs off the request path. Write failures are logged and counted here and
//! never travel back to the redirect that produced the event.

use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::access_event::AccessEvent;
use crate::domain::repositories::AccessLogRepository;
use crate::error::AppError;

/// Retries after the first failed write.
const MAX_WRITE_RETRIES: usize = 3;

/// Result of persisting a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogWriteOutcome {
    Written,
    /// The owning short URL no longer exists; the entry is discarded.
    MissingOwner,
    /// The store kept failing after all retries.
    Failed,
}

/// Consumes access events until every sender is dropped.
///
/// At most `concurrency` writes are in flight. Once the channel closes the
/// worker waits for in-flight writes before returning.
pub async fn run_access_log_worker<R>(
    mut rx: mpsc::Receiver<AccessEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: AccessLogRepository + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            persist_event(repository.as_ref(), event).await
        });

        while let Some(joined) = in_flight.try_join_next() {
            if let Err(e) = joined {
                error!(error = %e, "Access log write task panicked");
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Access log write task panicked");
        }
    }

    info!("Access log worker stopped");
}

/// Persists one event, retrying transient store errors.
pub async fn persist_event<R>(repository: &R, event: AccessEvent) -> LogWriteOutcome
where
    R: AccessLogRepository + ?Sized,
{
    let short_url_id = event.short_url_id;
    let new_log = event.into_new_access_log();

    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(MAX_WRITE_RETRIES);

    let result = RetryIf::start(
        strategy,
        || repository.insert(new_log.clone()),
        |e: &AppError| e.is_transient(),
    )
    .await;

    match result {
        Ok(log) => {
            counter!("access_log_written_total").increment(1);
            debug!(short_url_id, access_log_id = log.id, "Access log stored");
            LogWriteOutcome::Written
        }
        Err(AppError::NotFound { .. }) => {
            counter!("access_log_failed_total", "reason" => "missing_owner").increment(1);
            warn!(
                short_url_id,
                "Could not find owning record for log write, discarding access log"
            );
            LogWriteOutcome::MissingOwner
        }
        Err(e) => {
            counter!("access_log_failed_total", "reason" => "store_error").increment(1);
            error!(short_url_id, error = %e, "Failed to store access log");
            LogWriteOutcome::Failed
        }
    }
}
