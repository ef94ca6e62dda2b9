use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::config::{Secret, Settings};
use crate::domain::ticket::{StatusUpdate, Ticket, TicketEnvelope, TicketId};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const API_KEY_HEADER: &str = "X-Redmine-API-Key";

pub struct RedmineClient {
    http: Client,
    base_url: String,
    api_key: Secret,
}

impl RedmineClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.redmine_base_url.clone(),
            api_key: settings.redmine_api_key.clone(),
        }
    }

    fn issue_endpoint(base_url: &str, id: &TicketId) -> String {
        format!("{}/issues/{}.json", base_url.trim_end_matches('/'), id.as_str())
    }

    async fn ensure_success(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        Err(AppError::IssueTracker(format!(
            "Redmine responded with {status}: {body}"
        )))
    }
}

#[async_trait]
impl IssueTrackerService for RedmineClient {
    async fn fetch_ticket(&self, id: &TicketId) -> AppResult<Ticket> {
        let response = self
            .http
            .get(Self::issue_endpoint(&self.base_url, id))
            .header(API_KEY_HEADER, self.api_key.expose())
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Redmine: {err}")))?;

        let payload: TicketEnvelope = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|err| {
                AppError::IssueTracker(format!("failed to parse Redmine response: {err}"))
            })?;

        Ok(payload.issue)
    }

    async fn update_status(&self, id: &TicketId, status_id: u64) -> AppResult<()> {
        let response = self
            .http
            .put(Self::issue_endpoint(&self.base_url, id))
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&StatusUpdate::new(status_id))
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Redmine: {err}")))?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
