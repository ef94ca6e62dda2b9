use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::domain::ticket::TicketId;
use crate::services::{IssueTrackerService, TicketCloser};

/// Closes tickets by reading their status first and writing only when it
/// differs from the configured closed status.
///
/// Nothing guards against the ticket changing between the read and the write.
pub struct StatusCloser<T> {
    tracker: T,
    closed_status_id: u64,
}

impl<T> StatusCloser<T>
where
    T: IssueTrackerService,
{
    pub fn new(tracker: T, settings: &Settings) -> Self {
        Self {
            tracker,
            closed_status_id: settings.closed_status_id,
        }
    }

    #[cfg(test)]
    pub fn into_tracker(self) -> T {
        self.tracker
    }
}

#[async_trait]
impl<T> TicketCloser for StatusCloser<T>
where
    T: IssueTrackerService,
{
    async fn close(&self, id: &TicketId) {
        let ticket = match self.tracker.fetch_ticket(id).await {
            Ok(ticket) => ticket,
            Err(err) => {
                warn!(ticket = %id, "getting issue: {err}");
                return;
            }
        };

        if ticket.status.id == self.closed_status_id {
            let status = ticket.status.name.as_deref().unwrap_or("closed");
            info!(ticket = %id, status, "issue is already closed");
            return;
        }

        match self.tracker.update_status(id, self.closed_status_id).await {
            Ok(()) => info!(ticket = %id, status = self.closed_status_id, "issue closed"),
            Err(err) => error!(ticket = %id, "closing issue: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTracker;

    const CLOSED: u64 = 5;
    const IN_PROGRESS: u64 = 2;

    fn closer(tracker: FakeTracker) -> StatusCloser<FakeTracker> {
        StatusCloser::new(tracker, &Settings::with_overrides(&[("REDMINE_STATUS_ID", "5")]))
    }

    #[tokio::test]
    async fn closes_open_ticket() {
        let closer = closer(FakeTracker::default().with_ticket("42", IN_PROGRESS));

        closer.close(&TicketId::new("42")).await;

        assert_eq!(closer.tracker.reads(), 1);
        assert_eq!(closer.tracker.writes(), 1);
        assert_eq!(closer.tracker.status_of("42"), Some(CLOSED));
    }

    #[tokio::test]
    async fn already_closed_ticket_is_not_written() {
        let closer = closer(FakeTracker::default().with_ticket("42", CLOSED));

        closer.close(&TicketId::new("42")).await;
        closer.close(&TicketId::new("42")).await;

        assert_eq!(closer.tracker.reads(), 2);
        assert_eq!(closer.tracker.writes(), 0);
    }

    #[tokio::test]
    async fn second_close_only_reads() {
        let closer = closer(FakeTracker::default().with_ticket("42", IN_PROGRESS));

        closer.close(&TicketId::new("42")).await;
        closer.close(&TicketId::new("42")).await;

        assert_eq!(closer.tracker.reads(), 2);
        assert_eq!(closer.tracker.writes(), 1);
    }

    #[tokio::test]
    async fn failed_read_skips_write() {
        let closer = closer(
            FakeTracker::default()
                .with_ticket("42", IN_PROGRESS)
                .failing_read("42"),
        );

        closer.close(&TicketId::new("42")).await;

        assert_eq!(closer.tracker.reads(), 1);
        assert_eq!(closer.tracker.writes(), 0);
        assert_eq!(closer.tracker.status_of("42"), Some(IN_PROGRESS));
    }

    #[tokio::test]
    async fn failed_write_is_absorbed() {
        let closer = closer(
            FakeTracker::default()
                .with_ticket("42", IN_PROGRESS)
                .failing_write("42"),
        );

        closer.close(&TicketId::new("42")).await;

        assert_eq!(closer.tracker.writes(), 1);
        assert_eq!(closer.tracker.status_of("42"), Some(IN_PROGRESS));
    }
}
