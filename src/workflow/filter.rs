use regex::Regex;
use tracing::info;

use crate::config::Settings;
use crate::domain::event::FeedEvent;
use crate::domain::ticket::TicketId;
use crate::services::TicketCloser;

/// Finds the first line of `body` matching `pattern` and returns its capture.
///
/// Lines are searched, not matched whole; anchors in the pattern apply per line.
pub fn referenced_ticket(body: &str, pattern: &Regex) -> Option<TicketId> {
    body.lines().find_map(|line| {
        pattern
            .captures(line)
            .and_then(|captures| captures.get(1))
            .map(|id| TicketId::new(id.as_str()))
    })
}

/// Closes the ticket referenced by a closed pull request, if any.
pub async fn process_event<C>(event: &FeedEvent, closer: &C, settings: &Settings)
where
    C: TicketCloser + ?Sized,
{
    let Some(closure) = event.pull_request_closure() else {
        return;
    };
    let Some(ticket) = referenced_ticket(&closure.body, &settings.issue_pattern) else {
        return;
    };

    info!(ticket = %ticket, pr = closure.number, "closing issue, pull request is closed");
    closer.close(&ticket).await;
}
