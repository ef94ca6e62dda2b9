use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, ETAG, HeaderMap, IF_NONE_MATCH},
};
use tracing::{debug, error};

use crate::config::{Secret, Settings};
use crate::domain::cursor::PollCursor;
use crate::domain::event::FeedEvent;
use crate::error::{AppError, AppResult};
use crate::services::EventFeedService;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const POLL_INTERVAL_HEADER: &str = "x-poll-interval";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Result of one conditional fetch of the events endpoint.
#[derive(Debug)]
pub enum FetchOutcome {
    Modified {
        events: Vec<FeedEvent>,
        etag: Option<String>,
        advised: Duration,
    },
    NotModified {
        advised: Duration,
    },
    Failed(AppError),
}

/// Polls the repository events endpoint, pacing itself by the server's hints.
pub struct GithubFeed {
    http: Client,
    events_url: String,
    token: Secret,
    cursor: PollCursor,
}

impl GithubFeed {
    pub fn new(settings: &Settings) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| AppError::Feed(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            events_url: Self::events_endpoint(&settings.github_api_url, &settings.github_repo),
            token: settings.github_token.clone(),
            cursor: PollCursor::new(settings.polling_interval),
        })
    }

    #[cfg(test)]
    pub fn cursor(&self) -> &PollCursor {
        &self.cursor
    }

    fn events_endpoint(api_url: &str, repo: &str) -> String {
        format!("{}/repos/{}/events", api_url.trim_end_matches('/'), repo)
    }

    async fn fetch(&self) -> FetchOutcome {
        let mut request = self.http.get(&self.events_url).header(ACCEPT, GITHUB_MEDIA_TYPE);
        if !self.token.is_empty() {
            request = request.header(AUTHORIZATION, format!("token {}", self.token.expose()));
        }
        if let Some(etag) = self.cursor.etag() {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                return FetchOutcome::Failed(AppError::Feed(format!("failed to call GitHub: {err}")));
            }
        };

        let status = response.status();
        let advised = advised_interval(response.headers());
        if status == StatusCode::NOT_MODIFIED {
            return FetchOutcome::NotModified { advised };
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return FetchOutcome::Failed(AppError::Feed(format!(
                "GitHub responded with {status}: {body}"
            )));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        match response.json::<Vec<FeedEvent>>().await {
            Ok(events) => FetchOutcome::Modified {
                events,
                etag,
                advised,
            },
            Err(err) => FetchOutcome::Failed(AppError::Feed(format!(
                "failed to parse GitHub events: {err}"
            ))),
        }
    }
}

#[async_trait]
impl EventFeedService for GithubFeed {
    async fn poll(&mut self) -> Vec<FeedEvent> {
        match self.fetch().await {
            FetchOutcome::Modified {
                events,
                etag,
                advised,
            } => {
                self.cursor.record_modified(etag, advised);
                debug!(
                    count = events.len(),
                    interval_secs = self.cursor.interval().as_secs(),
                    "fetched events"
                );
                events
            }
            FetchOutcome::NotModified { advised } => {
                self.cursor.record_not_modified(advised);
                Vec::new()
            }
            FetchOutcome::Failed(err) => {
                error!("polling events: {err}");
                self.cursor.reset();
                Vec::new()
            }
        }
    }

    async fn sleep(&mut self) {
        tokio::time::sleep(self.cursor.interval()).await;
    }
}

/// Seconds the server asks us to wait. Absent or malformed means zero.
fn advised_interval(headers: &HeaderMap) -> Duration {
    headers
        .get(POLL_INTERVAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::ZERO)
}
