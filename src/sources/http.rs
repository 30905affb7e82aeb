use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use super::base::{AuthStatus, Credentials, DataSource, IssueFetch};
use crate::core::config::SprintCalendarConfig;
use crate::core::error::{CalendarError, Result};
use crate::core::normalizer::{RawHoliday, RawIssue, RawSprint, RawTeamMember};

#[derive(Debug, Deserialize)]
struct SprintsResponse {
    #[serde(default)]
    values: Vec<RawSprint>,
}

#[derive(Debug, Deserialize)]
struct IssuesResponse {
    #[serde(rename = "requestSuccess", default)]
    request_success: Option<bool>,
    #[serde(default)]
    issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
struct HolidaysResponse {
    #[serde(default)]
    items: Vec<RawHoliday>,
}


/// Reads the four feeds from the calendar API over HTTP.
pub struct HttpSource {
    base_url: Url,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| CalendarError::Config(format!("invalid api_base_url {base_url:?}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        info!("HTTP source initialized (url={})", base_url);

        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &SprintCalendarConfig) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CalendarError::Config(format!("invalid endpoint {path:?}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_sprints(&self) -> Result<Vec<RawSprint>> {
        let url = self.endpoint("api/Sprints")?;
        debug!("GET {}", url);
        let body: SprintsResponse = self.get_json(self.client.get(url)).await?;
        Ok(body.values)
    }

    async fn fetch_team_members(&self) -> Result<Vec<RawTeamMember>> {
        let url = self.endpoint("api/TeamMembers")?;
        debug!("GET {}", url);
        self.get_json(self.client.get(url)).await
    }

    async fn fetch_issues(&self, credentials: &Credentials) -> Result<IssueFetch> {
        let url = self.endpoint("api/Jira")?;
        debug!("GET {} as {}", url, credentials.email);
        let request = self
            .client
            .get(url)
            .basic_auth(&credentials.email, Some(&credentials.api_key));
        let body: IssuesResponse = self.get_json(request).await?;

        Ok(IssueFetch {
            auth: AuthStatus::from_flag(body.request_success),
            issues: body.issues,
        })
    }

    async fn fetch_holidays(&self, country: &str) -> Result<Vec<RawHoliday>> {
        let url = self.endpoint("api/PublicHoliday")?;
        debug!("GET {} countryName={}", url, country);
        let request = self.client.get(url).query(&[("countryName", country)]);
        let body: HolidaysResponse = self.get_json(request).await?;
        Ok(body.items)
    }

    fn source_name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoints_keep_base_path() {
        let source = HttpSource::new("http://localhost:8081", Duration::from_secs(5)).unwrap();
        assert_eq!(
            source.endpoint("api/Sprints").unwrap().as_str(),
            "http://localhost:8081/api/Sprints"
        );

        let nested = HttpSource::new("http://gateway.local/calendar", Duration::from_secs(5)).unwrap();
        assert_eq!(
            nested.endpoint("api/Jira").unwrap().as_str(),
            "http://gateway.local/calendar/api/Jira"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpSource::new("not a url", Duration::from_secs(5)).err().unwrap();
        assert!(matches!(err, CalendarError::Config(_)));
    }

    #[test]
    fn test_issue_payload_without_success_flag() {
        let body: IssuesResponse = serde_json::from_value(json!({
            "issues": [{ "id": 1, "fields": { "customfield_10016": 3, "customfield_10020": [{ "id": 2 }] } }]
        }))
        .unwrap();
        assert_eq!(body.request_success, None);
        assert_eq!(body.issues.len(), 1);
        assert_eq!(AuthStatus::from_flag(body.request_success), AuthStatus::Unreported);
    }

    #[test]
    fn test_holiday_payload_shape() {
        let body: HolidaysResponse = serde_json::from_value(json!({
            "kind": "calendar#events",
            "items": [{ "summary": "Boxing Day", "start": { "date": "2024-12-26" }, "end": { "date": "2024-12-27" } }]
        }))
        .unwrap();
        assert_eq!(body.items[0].summary.as_deref(), Some("Boxing Day"));
    }
}
