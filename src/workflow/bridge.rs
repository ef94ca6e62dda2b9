use tracing::debug;

use crate::config::Settings;
use crate::services::{EventFeedService, TicketCloser};
use crate::workflow::filter::process_event;

/// The poll, process, sleep loop tying the feed to the closer.
pub struct Bridge<'a, F, C> {
    feed: F,
    closer: C,
    settings: &'a Settings,
}

impl<'a, F, C> Bridge<'a, F, C>
where
    F: EventFeedService,
    C: TicketCloser,
{
    pub fn new(feed: F, closer: C, settings: &'a Settings) -> Self {
        Self {
            feed,
            closer,
            settings,
        }
    }

    /// Polls once and hands every event to the filter, in order.
    pub async fn run_cycle(&mut self) -> usize {
        let events = self.feed.poll().await;
        debug!(count = events.len(), "processing events");
        for event in &events {
            process_event(event, &self.closer, self.settings).await;
        }
        events.len()
    }

    /// Runs cycles until `stop` returns true for the number of completed
    /// cycles. Sleeps between cycles, never after the last one.
    pub async fn run_until<S>(&mut self, mut stop: S) -> u64
    where
        S: FnMut(u64) -> bool,
    {
        let mut cycles = 0;
        loop {
            self.run_cycle().await;
            cycles += 1;
            if stop(cycles) {
                return cycles;
            }
            self.feed.sleep().await;
        }
    }

    pub async fn run_forever(&mut self) {
        self.run_until(|_| false).await;
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (F, C) {
        (self.feed, self.closer)
    }
}
