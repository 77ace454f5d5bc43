use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use crate::feed::event::{decode_feed, SeismicEvent};
use crate::feed::source::FeedPeriod;
use crate::net;

/// A completed feed fetch, reported back to the UI thread.
pub struct FeedResponse {
    seq: u64,
    pub period: FeedPeriod,
    pub result: Result<Vec<SeismicEvent>, String>,
}

/// Monotonic sequence guard for in-flight requests.
///
/// The UI never cancels a download thread; instead each request carries the
/// sequence number it was issued under, and responses from superseded
/// requests are discarded. A rapid period switch therefore cannot let a slow
/// stale response overwrite a newer selection's result.
#[derive(Debug, Default)]
struct RequestGuard {
    issued: u64,
}

impl RequestGuard {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

/// Fetches feed documents on detached threads and reports decoded events
/// back over an `mpsc` channel, one fetch per period selection.
pub struct FeedLoader {
    tx: Sender<FeedResponse>,
    rx: Receiver<FeedResponse>,
    guard: RequestGuard,
    in_flight: bool,
}

impl FeedLoader {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            guard: RequestGuard::default(),
            in_flight: false,
        }
    }

    /// Starts downloading the given period's feed on a background thread.
    ///
    /// The download does not block the caller; the decoded result arrives
    /// through [`poll`](Self::poll).
    pub fn request(&mut self, period: FeedPeriod) {
        let seq = self.begin_request();
        let tx = self.tx.clone();

        thread::spawn(move || {
            log::debug!("fetching {:?} feed (seq {})", period, seq);
            let result = net::fetch_text(period.url())
                .and_then(|body| decode_feed(&body))
                .map_err(|e| e.to_string());

            match &result {
                Ok(events) => log::info!("{:?} feed: {} events (seq {})", period, events.len(), seq),
                Err(e) => log::warn!("{:?} feed failed (seq {}): {}", period, seq, e),
            }

            // Receiver may be gone during shutdown
            let _ = tx.send(FeedResponse {
                seq,
                period,
                result,
            });
        });
    }

    /// Polls for a completed fetch, discarding stale responses.
    pub fn poll(&mut self) -> Option<FeedResponse> {
        let mut latest = None;
        while let Ok(response) = self.rx.try_recv() {
            if self.guard.is_current(response.seq) {
                latest = Some(response);
            } else {
                log::debug!(
                    "discarding stale {:?} response (seq {} < {})",
                    response.period,
                    response.seq,
                    self.guard.issued
                );
            }
        }

        if latest.is_some() {
            self.in_flight = false;
        }
        latest
    }

    /// True while the latest request has not completed
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Number of fetches issued so far; threshold changes must not move this
    pub fn request_count(&self) -> u64 {
        self.guard.issued
    }

    fn begin_request(&mut self) -> u64 {
        self.in_flight = true;
        self.guard.issue()
    }
}

impl Default for FeedLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inject(loader: &FeedLoader, seq: u64, result: Result<Vec<SeismicEvent>, String>) {
        loader
            .tx
            .send(FeedResponse {
                seq,
                period: FeedPeriod::PastDay,
                result,
            })
            .unwrap();
    }

    #[test]
    fn test_request_guard_sequencing() {
        let mut guard = RequestGuard::default();
        let first = guard.issue();
        let second = guard.issue();

        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[test]
    fn test_poll_discards_stale_response() {
        let mut loader = FeedLoader::new();

        // Two selections in quick succession; only the second is current
        let stale_seq = loader.begin_request();
        let current_seq = loader.begin_request();

        inject(&loader, stale_seq, Ok(vec![]));
        assert!(loader.poll().is_none());
        assert!(loader.is_loading());

        inject(&loader, current_seq, Ok(vec![]));
        let response = loader.poll().expect("current response kept");
        assert!(response.result.is_ok());
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_poll_keeps_latest_of_backlog() {
        let mut loader = FeedLoader::new();
        let stale = loader.begin_request();
        let current = loader.begin_request();

        // Both responses already queued when the UI polls once
        inject(&loader, stale, Err("slow fetch".to_string()));
        inject(&loader, current, Ok(vec![]));

        let response = loader.poll().expect("one response surfaced");
        assert!(response.result.is_ok());
    }

    #[test]
    fn test_idle_loader_polls_nothing() {
        let mut loader = FeedLoader::new();
        assert!(loader.poll().is_none());
        assert!(!loader.is_loading());
        assert_eq!(loader.request_count(), 0);
    }
}
