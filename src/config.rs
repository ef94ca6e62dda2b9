use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;
use tracing::Level;

use crate::error::{AppError, AppResult};

const DEFAULT_GITHUB_REPO: &str = "<owner>/<repo>";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_REDMINE_BASE_URL: &str = "http://<redmine>";
const DEFAULT_ISSUE_PATTERN: &str = r"^RM: #(\d+)$";
const DEFAULT_STATUS_ID: u64 = 5;
const DEFAULT_POLLING_INTERVAL_SECS: u64 = 60;
const DEFAULT_LOG_LEVEL: &str = "info";

const REDACTED: &str = "<redacted>";
const NOT_SET: &str = "<not set>";

/// A credential that never prints its value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// What may be shown in place of the value.
    pub fn label(&self) -> &'static str {
        if self.is_empty() { NOT_SET } else { REDACTED }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Process-wide settings, resolved once at startup and handed to each
/// component by reference.
#[derive(Debug, Clone)]
pub struct Settings {
    pub github_repo: String,
    pub github_token: Secret,
    pub github_api_url: String,
    pub redmine_base_url: String,
    pub redmine_api_key: Secret,
    pub issue_pattern: Regex,
    pub closed_status_id: u64,
    pub polling_interval: Duration,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let issue_pattern = parse_pattern(&value_or("REDMINE_ISSUE_PATTERN", DEFAULT_ISSUE_PATTERN))?;
        let closed_status_id = match lookup("REDMINE_STATUS_ID") {
            Some(raw) => parse_number("REDMINE_STATUS_ID", &raw)?,
            None => DEFAULT_STATUS_ID,
        };
        let polling_secs = match lookup("POLLING_INTERVAL") {
            Some(raw) => parse_number("POLLING_INTERVAL", &raw)?,
            None => DEFAULT_POLLING_INTERVAL_SECS,
        };
        let log_level = normalize_log_level(&value_or("LOG_LEVEL", DEFAULT_LOG_LEVEL))?;

        Ok(Self {
            github_repo: value_or("GITHUB_REPO", DEFAULT_GITHUB_REPO),
            github_token: Secret::new(value_or("GITHUB_TOKEN", "")),
            github_api_url: value_or("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            redmine_base_url: value_or("REDMINE_BASE_URL", DEFAULT_REDMINE_BASE_URL),
            redmine_api_key: Secret::new(value_or("REDMINE_API_KEY", "")),
            issue_pattern,
            closed_status_id,
            polling_interval: Duration::from_secs(polling_secs),
            log_level,
        })
    }

    /// Name/value pairs as they may be shown to an operator.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("GITHUB_REPO", self.github_repo.clone()),
            ("GITHUB_TOKEN", self.github_token.label().to_string()),
            ("GITHUB_API_URL", self.github_api_url.clone()),
            ("REDMINE_BASE_URL", self.redmine_base_url.clone()),
            ("REDMINE_API_KEY", self.redmine_api_key.label().to_string()),
            ("REDMINE_ISSUE_PATTERN", self.issue_pattern.as_str().to_string()),
            ("REDMINE_STATUS_ID", self.closed_status_id.to_string()),
            ("POLLING_INTERVAL", self.polling_interval.as_secs().to_string()),
            ("LOG_LEVEL", self.log_level.clone()),
        ]
    }

    pub fn log_resolved(&self) {
        for (name, value) in self.describe() {
            tracing::debug!("config: {name} = {value:?}");
        }
    }
}

#[cfg(test)]
impl Settings {
    pub fn with_overrides(pairs: &[(&str, &str)]) -> Self {
        Self::from_lookup(|name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        })
        .expect("test settings must be valid")
    }
}

fn parse_pattern(raw: &str) -> AppResult<Regex> {
    let pattern = Regex::new(raw).map_err(|err| {
        AppError::Configuration(format!("REDMINE_ISSUE_PATTERN is not a valid pattern: {err}"))
    })?;
    // captures_len counts the implicit whole-match group.
    let groups = pattern.captures_len() - 1;
    if groups != 1 {
        return Err(AppError::Configuration(format!(
            "REDMINE_ISSUE_PATTERN must have exactly one capture group, found {groups}"
        )));
    }
    Ok(pattern)
}

fn parse_number(name: &str, raw: &str) -> AppResult<u64> {
    raw.trim().parse::<u64>().map_err(|err| {
        AppError::Configuration(format!("{name} must be a non-negative integer, got {raw:?}: {err}"))
    })
}

fn normalize_log_level(raw: &str) -> AppResult<String> {
    let lowered = raw.trim().to_lowercase();
    let name = match lowered.as_str() {
        "warning" => "warn",
        "critical" | "fatal" => "error",
        other => other,
    };
    Level::from_str(name)
        .map_err(|_| AppError::Configuration(format!("LOG_LEVEL {raw:?} is not a known level")))?;
    Ok(name.to_string())
}
