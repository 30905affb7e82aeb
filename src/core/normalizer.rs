//! Conversion of raw feed records into the typed entities the calendar works with.
//!
//! Raw records are deliberately loose (every field optional, ids as arbitrary
//! JSON) so a single bad record is rejected on its own instead of failing the
//! whole payload during deserialization.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{CalendarError, Result};
use super::models::{Holiday, Issue, SprintDescriptor, StoryPoints, TeamMember};


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLocation {
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    #[serde(rename = "Region", default)]
    pub region: Option<String>,
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTeamMember {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Location", default)]
    pub location: Option<RawLocation>,
}

impl RawTeamMember {
    pub fn new(name: &str, country: &str, region: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            location: Some(RawLocation {
                country: Some(country.to_string()),
                region: Some(region.to_string()),
            }),
        }
    }
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSprintRef {
    #[serde(default)]
    pub id: Option<Value>,
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIssueFields {
    #[serde(rename = "customfield_10016", default)]
    pub story_points: Option<Value>,
    #[serde(rename = "customfield_10020", default)]
    pub sprints: Option<Vec<RawSprintRef>>,
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIssue {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub fields: Option<RawIssueFields>,
}

impl RawIssue {
    pub fn new(id: i64, story_points: Value, sprint_id: i64) -> Self {
        Self {
            id: Some(Value::from(id)),
            fields: Some(RawIssueFields {
                story_points: Some(story_points),
                sprints: Some(vec![RawSprintRef {
                    id: Some(Value::from(sprint_id)),
                }]),
            }),
        }
    }
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSprint {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
}

impl RawSprint {
    pub fn new(id: i64, name: &str, start_date: &str, end_date: &str) -> Self {
        Self {
            id: Some(Value::from(id)),
            name: Some(name.to_string()),
            start_date: Some(start_date.to_string()),
            end_date: Some(end_date.to_string()),
        }
    }
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHolidayDate {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "dateTime", default)]
    pub date_time: Option<String>,
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHoliday {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: Option<RawHolidayDate>,
    #[serde(default)]
    pub end: Option<RawHolidayDate>,
}

impl RawHoliday {
    pub fn new(summary: &str, start: &str, end: &str) -> Self {
        let date = |d: &str| RawHolidayDate {
            date: Some(d.to_string()),
            date_time: None,
        };
        Self {
            summary: Some(summary.to_string()),
            start: Some(date(start)),
            end: Some(date(end)),
        }
    }
}


/// Records that normalized cleanly, plus the rejections for reporting.
#[derive(Debug)]
pub struct NormalizedBatch<T> {
    pub entities: Vec<T>,
    pub rejected: Vec<CalendarError>,
}

impl<T> NormalizedBatch<T> {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}


pub fn normalize_batch<R, T>(records: &[R], normalize: impl Fn(&R) -> Result<T>) -> NormalizedBatch<T> {
    let mut entities = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for (position, record) in records.iter().enumerate() {
        match normalize(record) {
            Ok(entity) => entities.push(entity),
            Err(e) => {
                warn!("Skipping record #{}: {}", position, e);
                rejected.push(e);
            }
        }
    }

    NormalizedBatch { entities, rejected }
}


pub fn normalize_team_member(raw: &RawTeamMember) -> Result<TeamMember> {
    let name = required_text(raw.name.as_deref(), "team member", "Name")?;
    let location = raw
        .location
        .as_ref()
        .ok_or_else(|| CalendarError::malformed("team member", "missing field `Location`"))?;
    let country = required_text(location.country.as_deref(), "team member", "Location.Country")?;

    Ok(TeamMember {
        name,
        country,
        region: location.region.clone().unwrap_or_default(),
    })
}


/// An issue without a usable id is kept: only its points and sprint matter.
pub fn normalize_issue(raw: &RawIssue) -> Result<Issue> {
    let id = raw.id.as_ref().and_then(parse_id);
    let label = id.map_or_else(|| "without id".to_string(), |id| id.to_string());
    if id.is_none() {
        warn!("Issue has a missing or non-numeric `id`, keeping it");
    }

    let fields = raw
        .fields
        .as_ref()
        .ok_or_else(|| CalendarError::malformed("issue", format!("issue {label} has no `fields`")))?;

    // The first sprint reference is the sprint that currently owns the issue.
    let sprint_id = fields
        .sprints
        .as_ref()
        .and_then(|refs| refs.first())
        .and_then(|r| r.id.as_ref())
        .and_then(parse_id)
        .ok_or_else(|| {
            CalendarError::malformed("issue", format!("issue {label} has no sprint reference"))
        })?;

    let story_points = parse_story_points(fields.story_points.as_ref());
    if let StoryPoints::Unparseable { raw } = &story_points {
        debug!("Issue {} has unparseable story points: {:?}", label, raw);
    }

    Ok(Issue {
        id,
        story_points,
        sprint_id,
    })
}


pub fn normalize_sprint(raw: &RawSprint) -> Result<SprintDescriptor> {
    let id = raw
        .id
        .as_ref()
        .and_then(parse_id)
        .ok_or_else(|| CalendarError::malformed("sprint", "missing or non-numeric `id`"))?;
    let name = required_text(raw.name.as_deref(), "sprint", "name")?;
    let start = required_date(raw.start_date.as_deref(), "sprint", "startDate")?;
    let end = required_date(raw.end_date.as_deref(), "sprint", "endDate")?;

    Ok(SprintDescriptor {
        id,
        name,
        start,
        end,
    })
}


/// Holidays carry no country of their own; it is the country they were requested for.
pub fn normalize_holiday(raw: &RawHoliday, country: &str) -> Result<Holiday> {
    let name = required_text(raw.summary.as_deref(), "holiday", "summary")?;
    let start = required_date(holiday_date(raw.start.as_ref()), "holiday", "start.date")?;
    let end = required_date(holiday_date(raw.end.as_ref()), "holiday", "end.date")?;

    Ok(Holiday {
        name,
        country: country.to_string(),
        start,
        end,
    })
}

fn holiday_date(date: Option<&RawHolidayDate>) -> Option<&str> {
    date.and_then(|d| d.date.as_deref().or(d.date_time.as_deref()))
}

fn required_text(value: Option<&str>, entity: &'static str, field: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(CalendarError::malformed(entity, format!("missing field `{field}`"))),
    }
}

fn required_date(value: Option<&str>, entity: &'static str, field: &str) -> Result<NaiveDate> {
    let text = value.ok_or_else(|| CalendarError::malformed(entity, format!("missing field `{field}`")))?;
    parse_date(text).ok_or_else(|| {
        CalendarError::malformed(entity, format!("`{field}` is not a date: {text:?}"))
    })
}


pub fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}


/// Accepts plain dates, RFC 3339 timestamps and naive ISO timestamps.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}


pub fn parse_story_points(value: Option<&Value>) -> StoryPoints {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => parse_leading_integer(s),
        _ => None,
    };

    match parsed {
        Some(points) => StoryPoints::Estimated { points },
        None => StoryPoints::Unparseable {
            raw: value.map(Value::to_string).unwrap_or_default(),
        },
    }
}

// "8", " 5 ", "3pts" and "+2" all read their leading integer; "", "abc" and "-" do not.
fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
