use serde::Deserialize;
use serde_json::Value;

pub const PULL_REQUEST_EVENT: &str = "PullRequestEvent";
pub const CLOSED_ACTION: &str = "closed";

/// One record of the repository activity feed.
///
/// The payload is kept untyped: its shape depends on the event type and only
/// pull-request payloads are ever inspected.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

/// The parts of a closed pull request the bridge cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestClosure {
    pub number: Option<u64>,
    pub body: String,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    action: Option<String>,
    number: Option<u64>,
    pull_request: Option<PullRequestFields>,
}

#[derive(Deserialize)]
struct PullRequestFields {
    body: Option<String>,
}

impl FeedEvent {
    /// Returns the closure details when this event is a closed pull request.
    pub fn pull_request_closure(&self) -> Option<PullRequestClosure> {
        if self.kind != PULL_REQUEST_EVENT {
            return None;
        }
        let payload = PullRequestPayload::deserialize(&self.payload).ok()?;
        if payload.action.as_deref() != Some(CLOSED_ACTION) {
            return None;
        }
        let body = payload
            .pull_request
            .and_then(|pr| pr.body)
            .unwrap_or_default();
        Some(PullRequestClosure {
            number: payload.number,
            body,
        })
    }
}
