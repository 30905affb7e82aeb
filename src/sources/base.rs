use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::normalizer::{RawHoliday, RawIssue, RawSprint, RawTeamMember};


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_key: api_key.into(),
        }
    }
}


/// Whether the issue tracker accepted the credentials. Trackers that do not
/// report it at all are treated as having accepted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Succeeded,
    Failed,
    Unreported,
}

impl AuthStatus {
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Succeeded,
            Some(false) => Self::Failed,
            None => Self::Unreported,
        }
    }

    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}


#[derive(Debug, Clone)]
pub struct IssueFetch {
    pub auth: AuthStatus,
    pub issues: Vec<RawIssue>,
}


#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_sprints(&self) -> Result<Vec<RawSprint>>;

    async fn fetch_team_members(&self) -> Result<Vec<RawTeamMember>>;

    async fn fetch_issues(&self, credentials: &Credentials) -> Result<IssueFetch>;

    /// `country` is passed exactly as it should appear in the request.
    async fn fetch_holidays(&self, country: &str) -> Result<Vec<RawHoliday>>;

    fn source_name(&self) -> &str;
}


#[async_trait]
impl DataSource for Arc<dyn DataSource> {
    async fn fetch_sprints(&self) -> Result<Vec<RawSprint>> {
        (**self).fetch_sprints().await
    }

    async fn fetch_team_members(&self) -> Result<Vec<RawTeamMember>> {
        (**self).fetch_team_members().await
    }

    async fn fetch_issues(&self, credentials: &Credentials) -> Result<IssueFetch> {
        (**self).fetch_issues(credentials).await
    }

    async fn fetch_holidays(&self, country: &str) -> Result<Vec<RawHoliday>> {
        (**self).fetch_holidays(country).await
    }

    fn source_name(&self) -> &str {
        (**self).source_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_flag_means_accepted() {
        assert_eq!(AuthStatus::from_flag(None), AuthStatus::Unreported);
        assert!(AuthStatus::from_flag(None).is_accepted());
        assert!(AuthStatus::from_flag(Some(true)).is_accepted());
        assert!(!AuthStatus::from_flag(Some(false)).is_accepted());
    }
}
