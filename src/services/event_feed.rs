use async_trait::async_trait;

use crate::domain::event::FeedEvent;

/// A source of activity events that paces its own polling.
#[async_trait]
pub trait EventFeedService: Send {
    /// Fetches the next batch. Failures are absorbed and yield an empty batch.
    async fn poll(&mut self) -> Vec<FeedEvent>;
    /// Waits for the currently effective poll interval.
    async fn sleep(&mut self);
}
