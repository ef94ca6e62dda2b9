pub mod event_feed;
pub mod issue_tracker;

pub use event_feed::EventFeedService;
pub use issue_tracker::{IssueTrackerService, TicketCloser};
