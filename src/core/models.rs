use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub country: String,
    pub region: String,
}

impl TeamMember {
    pub fn is_in_country(&self, country: &str) -> bool {
        self.country.to_lowercase() == country.to_lowercase()
    }
}


/// Story-point estimate as reported by the issue tracker.
///
/// A value that could not be read as an integer is kept rather than dropped so
/// that the owning sprint can decide how to account for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StoryPoints {
    Estimated { points: i64 },
    Unparseable { raw: String },
}

impl StoryPoints {
    pub fn points(&self) -> Option<i64> {
        match self {
            Self::Estimated { points } => Some(*points),
            Self::Unparseable { .. } => None,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Absent when the tracker sent no usable id; the issue still counts.
    pub id: Option<i64>,
    pub story_points: StoryPoints,
    pub sprint_id: i64,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryTotal {
    Points(i64),
    /// At least one constituent issue had unparseable points.
    Poisoned,
}

impl StoryTotal {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Points(points) => *points as f64,
            Self::Poisoned => f64::NAN,
        }
    }

    pub fn points(&self) -> Option<i64> {
        match self {
            Self::Points(points) => Some(*points),
            Self::Poisoned => None,
        }
    }
}

impl Default for StoryTotal {
    fn default() -> Self {
        Self::Points(0)
    }
}


/// Sprint descriptor after normalization, before issues are joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintDescriptor {
    pub id: i64,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: i64,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub issues: Vec<Issue>,
    pub story_total: StoryTotal,
}

impl Sprint {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub country: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Sprint,
    Holiday,
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventColor {
    pub primary: String,
    pub secondary: String,
}

impl EventColor {
    pub fn solid(hex: impl Into<String>) -> Self {
        let hex = hex.into();
        Self {
            primary: hex.clone(),
            secondary: hex,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Sprint { sprint: Sprint },
    Holiday { holiday: Holiday },
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<EventColor>,
    pub meta: EventPayload,
}

impl CalendarEvent {
    pub fn kind(&self) -> EventKind {
        match self.meta {
            EventPayload::Sprint { .. } => EventKind::Sprint,
            EventPayload::Holiday { .. } => EventKind::Holiday,
        }
    }

    pub fn sprint(&self) -> Option<&Sprint> {
        match &self.meta {
            EventPayload::Sprint { sprint } => Some(sprint),
            EventPayload::Holiday { .. } => None,
        }
    }

    pub fn holiday(&self) -> Option<&Holiday> {
        match &self.meta {
            EventPayload::Holiday { holiday } => Some(holiday),
            EventPayload::Sprint { .. } => None,
        }
    }
}
