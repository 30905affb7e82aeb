pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;

pub use config::{SprintCalendarConfig, StoryPointsPolicy};
pub use error::{CalendarError, Result};
pub use models::{
    CalendarEvent, EventColor, EventKind, EventPayload, Holiday, Issue, Sprint, SprintDescriptor,
    StoryPoints, StoryTotal, TeamMember,
};


pub use normalizer::{
    NormalizedBatch, RawHoliday, RawIssue, RawSprint, RawTeamMember, normalize_batch,
    normalize_holiday, normalize_issue, normalize_sprint, normalize_team_member,
};
