use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::error::Result;


pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8081";


pub const DEFAULT_VELOCITY_WINDOW: usize = 3;


pub const DEFAULT_SPRINT_COLOR: &str = "#ff0037";


/// How an issue whose story points could not be parsed affects its sprint total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoryPointsPolicy {
    #[default]
    Poison,
    TreatAsZero,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintCalendarConfig {
    pub api_base_url: String,
    pub email: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,

    pub velocity_window: usize,
    pub story_points_policy: StoryPointsPolicy,
    pub sprint_color: String,
}

impl SprintCalendarConfig {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            email: String::new(),
            api_key: None,
            request_timeout_secs: 30,

            velocity_window: DEFAULT_VELOCITY_WINDOW,
            story_points_policy: StoryPointsPolicy::default(),
            sprint_color: DEFAULT_SPRINT_COLOR.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::new(
            &std::env::var("SPRINT_CALENDAR_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        );

        if let Ok(email) = std::env::var("SPRINT_CALENDAR_EMAIL") {
            config.email = email;
        }
        if let Ok(key) = std::env::var("SPRINT_CALENDAR_API_KEY") {
            config.api_key = Some(key);
        }
        if let Some(timeout) = std::env::var("SPRINT_CALENDAR_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.request_timeout_secs = timeout;
        }
        if let Some(window) = std::env::var("SPRINT_CALENDAR_VELOCITY_WINDOW")
            .ok()
            .and_then(|w| w.parse().ok())
        {
            config.velocity_window = window;
        }
        if let Some(policy) = std::env::var("SPRINT_CALENDAR_STORY_POINTS_POLICY")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            config.story_points_policy = policy;
        }
        if let Ok(color) = std::env::var("SPRINT_CALENDAR_SPRINT_COLOR") {
            config.sprint_color = color;
        }

        config
    }

    /// Loads a TOML/YAML/JSON file, then lets `SPRINT_CALENDAR_*` variables override it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(::config::Environment::with_prefix("SPRINT_CALENDAR"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for SprintCalendarConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
