//! Non-blocking handle for enqueueing access events.

use metrics::counter;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, warn};

use crate::domain::access_event::AccessEvent;

/// Sending half of the access log queue.
///
/// [`AccessLogSink::record`] never waits and never fails: when the queue is
/// full or the worker is gone the event is dropped and reported. A missing
/// log entry is acceptable, a slow or failed redirect is not.
#[derive(Debug, Clone)]
pub struct AccessLogSink {
    sender: mpsc::Sender<AccessEvent>,
}

impl AccessLogSink {
    pub fn new(sender: mpsc::Sender<AccessEvent>) -> Self {
        Self { sender }
    }

    /// Creates a bounded queue and returns the sink with its receiving half.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AccessEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Enqueues an event for the background worker.
    pub fn record(&self, event: AccessEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {
                counter!("access_log_enqueued_total").increment(1);
            }
            Err(TrySendError::Full(event)) => {
                counter!("access_log_dropped_total", "reason" => "queue_full").increment(1);
                warn!(
                    short_url_id = event.short_url_id,
                    "Access log queue full, dropping event"
                );
            }
            Err(TrySendError::Closed(event)) => {
                counter!("access_log_dropped_total", "reason" => "queue_closed").increment(1);
                error!(
                    short_url_id = event.short_url_id,
                    "Access log queue closed, dropping event"
                );
            }
        }
    }

    /// Returns true if the worker has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Returns the number of free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    /// Returns the configured queue size.
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access_event::VisitorInfo;
    use chrono::Utc;

    fn event(id: i64) -> AccessEvent {
        AccessEvent::new(id, VisitorInfo::default(), Utc::now())
    }

    #[tokio::test]
    async fn test_record_delivers_event() {
        let (sink, mut rx) = AccessLogSink::channel(4);

        sink.record(event(1));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.short_url_id, 1);
    }

    #[test]
    fn test_record_drops_when_full() {
        let (sink, mut rx) = AccessLogSink::channel(1);

        sink.record(event(1));
        sink.record(event(2));

        assert_eq!(rx.try_recv().unwrap().short_url_id, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_record_after_close_does_not_panic() {
        let (sink, rx) = AccessLogSink::channel(1);
        drop(rx);

        assert!(sink.is_closed());
        sink.record(event(1));
    }

    #[test]
    fn test_capacity_reporting() {
        let (sink, _rx) = AccessLogSink::channel(8);
        assert_eq!(sink.max_capacity(), 8);
        assert_eq!(sink.capacity(), 8);

        sink.record(event(1));
        assert_eq!(sink.capacity(), 7);
    }
}
