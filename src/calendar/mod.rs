pub mod joiner;
pub mod materializer;
pub mod overlap;
pub mod velocity;

pub use joiner::{join_issues, orphaned_issues, story_total};
pub use materializer::{holiday_event, holiday_events, inclusive_end, sprint_event, sprint_events};
pub use overlap::{HolidayView, absent_members, filter_overlapping, holiday_overlaps_sprints, select};
pub use velocity::{VelocityWindow, velocity, velocity_for_event};
