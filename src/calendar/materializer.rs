use chrono::NaiveDate;

use crate::core::models::{CalendarEvent, EventColor, EventPayload, Holiday, Sprint};


/// Upstream end dates are exclusive (the day after the last day). Calendar
/// events use the inclusive last day.
pub fn inclusive_end(exclusive_end: NaiveDate) -> NaiveDate {
    exclusive_end.pred_opt().unwrap_or(exclusive_end)
}


pub fn sprint_event(sprint: &Sprint, color: Option<&EventColor>) -> CalendarEvent {
    CalendarEvent {
        start: sprint.start,
        end: inclusive_end(sprint.end),
        title: sprint.name.clone(),
        color: color.cloned(),
        meta: EventPayload::Sprint {
            sprint: sprint.clone(),
        },
    }
}


pub fn holiday_event(holiday: &Holiday) -> CalendarEvent {
    CalendarEvent {
        start: holiday.start,
        end: inclusive_end(holiday.end),
        title: holiday.name.clone(),
        color: None,
        meta: EventPayload::Holiday {
            holiday: holiday.clone(),
        },
    }
}


pub fn sprint_events(sprints: &[Sprint], color: Option<&EventColor>) -> Vec<CalendarEvent> {
    sprints.iter().map(|s| sprint_event(s, color)).collect()
}


pub fn holiday_events(holidays: &[Holiday]) -> Vec<CalendarEvent> {
    holidays.iter().map(holiday_event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{EventKind, StoryTotal};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sprint(id: i64, start: NaiveDate, end: NaiveDate) -> Sprint {
        Sprint {
            id,
            name: format!("Sprint {id}"),
            start,
            end,
            issues: vec![],
            story_total: StoryTotal::Points(0),
        }
    }

    #[test]
    fn test_sprint_end_moves_back_one_day() {
        let s = sprint(1, date(2024, 1, 1), date(2024, 1, 8));
        let event = sprint_event(&s, Some(&EventColor::solid("#ff0037")));

        assert_eq!(event.start, date(2024, 1, 1));
        assert_eq!(event.end, date(2024, 1, 7));
        assert_eq!(event.title, "Sprint 1");
        assert_eq!(event.kind(), EventKind::Sprint);
        assert_eq!(event.sprint(), Some(&s));
        assert_eq!(event.color.as_ref().map(|c| c.primary.as_str()), Some("#ff0037"));
    }

    #[test]
    fn test_single_day_holiday() {
        let holiday = Holiday {
            name: "Waitangi Day".into(),
            country: "New Zealand".into(),
            start: date(2024, 2, 6),
            end: date(2024, 2, 7),
        };
        let event = holiday_event(&holiday);

        assert_eq!(event.start, event.end);
        assert_eq!(event.kind(), EventKind::Holiday);
        assert!(event.color.is_none());
        assert_eq!(event.holiday().map(|h| h.country.as_str()), Some("New Zealand"));
    }

    #[test]
    fn test_end_adjustment_crosses_month_boundary() {
        assert_eq!(inclusive_end(date(2024, 3, 1)), date(2024, 2, 29));
    }

    #[test]
    fn test_batch_preserves_order() {
        let sprints = vec![
            sprint(3, date(2024, 2, 1), date(2024, 2, 15)),
            sprint(1, date(2024, 1, 1), date(2024, 1, 15)),
        ];
        let events = sprint_events(&sprints, None);
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Sprint 3", "Sprint 1"]);
    }
}
