use std::fmt;

use serde::{Deserialize, Serialize};

/// Ticket identifier as captured from a pull-request body. Kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketId(pub String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ticket {
    pub status: TicketStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TicketStatus {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Envelope the tracker wraps a single issue in.
#[derive(Debug, Deserialize)]
pub struct TicketEnvelope {
    pub issue: Ticket,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub issue: StatusUpdateFields,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateFields {
    pub status_id: u64,
}

impl StatusUpdate {
    pub fn new(status_id: u64) -> Self {
        Self {
            issue: StatusUpdateFields { status_id },
        }
    }
}
