use std::time::Duration;

/// Poller state carried between fetches: the last cache validator and the
/// interval to wait before the next fetch.
///
/// The interval never drops below the configured minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollCursor {
    etag: Option<String>,
    interval: Duration,
    min_interval: Duration,
}

impl PollCursor {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            etag: None,
            interval: min_interval,
            min_interval,
        }
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// A full response arrived: its validator replaces ours, even when absent.
    pub fn record_modified(&mut self, etag: Option<String>, advised: Duration) {
        self.etag = etag;
        self.interval = self.select_interval(advised);
    }

    /// The server confirmed our validator is current.
    pub fn record_not_modified(&mut self, advised: Duration) {
        self.interval = self.select_interval(advised);
    }

    /// Forget everything learned from the server.
    pub fn reset(&mut self) {
        self.etag = None;
        self.interval = self.min_interval;
    }

    fn select_interval(&self, advised: Duration) -> Duration {
        advised.max(self.min_interval)
    }
}
