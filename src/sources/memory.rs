use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::base::{AuthStatus, Credentials, DataSource, IssueFetch};
use crate::core::error::{CalendarError, Result};
use crate::core::normalizer::{RawHoliday, RawIssue, RawSprint, RawTeamMember};

type Feed<T> = std::result::Result<Vec<T>, String>;


/// Canned feeds with optional per-request latency and failures. Every request
/// is appended to a call log so callers can check the order they were issued in.
pub struct InMemorySource {
    sprints: Feed<RawSprint>,
    team_members: Feed<RawTeamMember>,
    issues: std::result::Result<(AuthStatus, Vec<RawIssue>), String>,
    holidays: HashMap<String, Feed<RawHoliday>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self {
            sprints: Ok(Vec::new()),
            team_members: Ok(Vec::new()),
            issues: Ok((AuthStatus::Unreported, Vec::new())),
            holidays: HashMap::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_sprints(mut self, sprints: Vec<RawSprint>) -> Self {
        self.sprints = Ok(sprints);
        self
    }

    pub fn with_team_members(mut self, members: Vec<RawTeamMember>) -> Self {
        self.team_members = Ok(members);
        self
    }

    pub fn with_issues(mut self, auth: AuthStatus, issues: Vec<RawIssue>) -> Self {
        self.issues = Ok((auth, issues));
        self
    }

    /// Holidays served for `country`, matched without regard to case.
    pub fn with_holidays(mut self, country: &str, holidays: Vec<RawHoliday>) -> Self {
        self.holidays.insert(country.to_lowercase(), Ok(holidays));
        self
    }

    pub fn failing_sprints(mut self, message: &str) -> Self {
        self.sprints = Err(message.to_string());
        self
    }

    pub fn failing_team_members(mut self, message: &str) -> Self {
        self.team_members = Err(message.to_string());
        self
    }

    pub fn failing_issues(mut self, message: &str) -> Self {
        self.issues = Err(message.to_string());
        self
    }

    pub fn failing_holidays(mut self, country: &str, message: &str) -> Self {
        self.holidays
            .insert(country.to_lowercase(), Err(message.to_string()));
        self
    }

    /// Latency for one request, keyed `sprints`, `team_members`, `issues` or
    /// `holidays:<country>` (lowercase).
    pub fn with_delay(mut self, request: &str, delay: Duration) -> Self {
        self.delays.insert(request.to_string(), delay);
        self
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn respond<T: Clone>(&self, request: &str, feed: &Feed<T>) -> Result<Vec<T>> {
        self.calls.lock().await.push(format!("start {request}"));
        if let Some(delay) = self.delays.get(request) {
            tokio::time::sleep(*delay).await;
        }
        self.calls.lock().await.push(format!("end {request}"));
        debug!("In-memory response for {}", request);

        feed.clone().map_err(CalendarError::Transport)
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for InMemorySource {
    async fn fetch_sprints(&self) -> Result<Vec<RawSprint>> {
        self.respond("sprints", &self.sprints).await
    }

    async fn fetch_team_members(&self) -> Result<Vec<RawTeamMember>> {
        self.respond("team_members", &self.team_members).await
    }

    async fn fetch_issues(&self, _credentials: &Credentials) -> Result<IssueFetch> {
        let (auth, feed) = match &self.issues {
            Ok((auth, issues)) => (*auth, Ok(issues.clone())),
            Err(message) => (AuthStatus::Unreported, Err(message.clone())),
        };
        let issues = self.respond("issues", &feed).await?;
        Ok(IssueFetch { auth, issues })
    }

    async fn fetch_holidays(&self, country: &str) -> Result<Vec<RawHoliday>> {
        let country = country.to_lowercase();
        let request = format!("holidays:{country}");
        let unknown: Feed<RawHoliday> = Ok(Vec::new());
        let feed = self.holidays.get(&country).unwrap_or(&unknown);
        self.respond(&request, feed).await
    }

    fn source_name(&self) -> &str {
        "in-memory"
    }
}
