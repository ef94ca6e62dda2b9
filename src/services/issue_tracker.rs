use async_trait::async_trait;

use crate::domain::ticket::{Ticket, TicketId};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn fetch_ticket(&self, id: &TicketId) -> AppResult<Ticket>;
    async fn update_status(&self, id: &TicketId, status_id: u64) -> AppResult<()>;
}

/// Moves a ticket to the closed state. Never fails: problems are logged.
#[async_trait]
pub trait TicketCloser: Send + Sync {
    async fn close(&self, id: &TicketId);
}
