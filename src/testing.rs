//! In-memory stand-ins for the external services.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use crate::domain::event::FeedEvent;
use crate::domain::ticket::{Ticket, TicketId, TicketStatus};
use crate::error::{AppError, AppResult};
use crate::services::{EventFeedService, IssueTrackerService, TicketCloser};

pub fn closed_pull_request(number: u64, body: Option<&str>) -> FeedEvent {
    event("PullRequestEvent", "closed", number, body)
}

pub fn event(kind: &str, action: &str, number: u64, body: Option<&str>) -> FeedEvent {
    serde_json::from_value(json!({
        "type": kind,
        "payload": {
            "action": action,
            "number": number,
            "pull_request": {"body": body}
        }
    }))
    .expect("fixture event must decode")
}

/// Tracker holding ticket statuses in memory and counting calls.
#[derive(Default)]
pub struct FakeTracker {
    statuses: Mutex<HashMap<String, u64>>,
    failing_reads: Vec<String>,
    failing_writes: Vec<String>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl FakeTracker {
    pub fn with_ticket(self, id: &str, status_id: u64) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(id.to_string(), status_id);
        self
    }

    pub fn failing_read(mut self, id: &str) -> Self {
        self.failing_reads.push(id.to_string());
        self
    }

    pub fn failing_write(mut self, id: &str) -> Self {
        self.failing_writes.push(id.to_string());
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn status_of(&self, id: &str) -> Option<u64> {
        self.statuses.lock().unwrap().get(id).copied()
    }
}

#[async_trait]
impl IssueTrackerService for FakeTracker {
    async fn fetch_ticket(&self, id: &TicketId) -> AppResult<Ticket> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing_reads.iter().any(|failing| failing == id.as_str()) {
            return Err(AppError::IssueTracker(format!("read of {id} refused")));
        }
        let status = self
            .status_of(id.as_str())
            .ok_or_else(|| AppError::IssueTracker(format!("issue {id} not found")))?;
        Ok(Ticket {
            status: TicketStatus {
                id: status,
                name: None,
            },
        })
    }

    async fn update_status(&self, id: &TicketId, status_id: u64) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing_writes.iter().any(|failing| failing == id.as_str()) {
            return Err(AppError::IssueTracker(format!("write of {id} refused")));
        }
        self.statuses
            .lock()
            .unwrap()
            .insert(id.to_string(), status_id);
        Ok(())
    }
}

/// Closer that only remembers which tickets it was asked to close.
#[derive(Default)]
pub struct RecordingCloser {
    closed: Mutex<Vec<String>>,
}

impl RecordingCloser {
    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketCloser for RecordingCloser {
    async fn close(&self, id: &TicketId) {
        self.closed.lock().unwrap().push(id.to_string());
    }
}

/// Feed replaying prepared batches, then returning empty ones. Never sleeps.
#[derive(Default)]
pub struct ScriptedFeed {
    batches: VecDeque<Vec<FeedEvent>>,
    pub polls: usize,
    pub sleeps: usize,
}

impl ScriptedFeed {
    pub fn new(batches: Vec<Vec<FeedEvent>>) -> Self {
        Self {
            batches: batches.into(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl EventFeedService for ScriptedFeed {
    async fn poll(&mut self) -> Vec<FeedEvent> {
        self.polls += 1;
        self.batches.pop_front().unwrap_or_default()
    }

    async fn sleep(&mut self) {
        self.sleeps += 1;
    }
}
