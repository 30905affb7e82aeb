pub mod aggregation;
pub mod calendar;
pub mod core;
pub mod sources;


pub use crate::aggregation::{Aggregation, AggregationReport, Aggregator, CalendarStore};
pub use crate::calendar::{HolidayView, VelocityWindow};
pub use crate::core::config::SprintCalendarConfig;
pub use crate::core::error::{CalendarError, Result};
pub use crate::core::models::{CalendarEvent, EventKind, Holiday, Issue, Sprint, TeamMember};
pub use crate::sources::{Credentials, DataSource, HttpSource, InMemorySource};
