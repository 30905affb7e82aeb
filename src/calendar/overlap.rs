use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::core::models::{CalendarEvent, EventKind, Holiday, Sprint, TeamMember};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HolidayView {
    #[default]
    All,
    OverlappingOnly,
}


pub fn holiday_overlaps_sprints(event: &CalendarEvent, sprints: &[Sprint]) -> bool {
    sprints.iter().any(|sprint| sprint.contains(event.start))
}


/// All sprint events, plus the holiday events whose start date falls inside
/// at least one sprint (both bounds inclusive). Borrows from `events`; the
/// full set is never touched.
pub fn filter_overlapping<'a>(events: &'a [CalendarEvent], sprints: &[Sprint]) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|event| match event.kind() {
            EventKind::Sprint => true,
            EventKind::Holiday => holiday_overlaps_sprints(event, sprints),
        })
        .collect()
}


pub fn select<'a>(events: &'a [CalendarEvent], sprints: &[Sprint], view: HolidayView) -> Vec<&'a CalendarEvent> {
    match view {
        HolidayView::All => events.iter().collect(),
        HolidayView::OverlappingOnly => filter_overlapping(events, sprints),
    }
}


/// Team members based in the holiday's country.
pub fn absent_members<'a>(holiday: &Holiday, members: &'a [TeamMember]) -> Vec<&'a TeamMember> {
    members
        .iter()
        .filter(|member| member.is_in_country(&holiday.country))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::materializer::{holiday_event, sprint_event};
    use crate::core::models::StoryTotal;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march_sprint() -> Sprint {
        Sprint {
            id: 1,
            name: "March".into(),
            start: date(2024, 3, 1),
            end: date(2024, 3, 14),
            issues: vec![],
            story_total: StoryTotal::Points(0),
        }
    }

    fn holiday(name: &str, country: &str, start: NaiveDate) -> Holiday {
        Holiday {
            name: name.into(),
            country: country.into(),
            start,
            end: start.succ_opt().unwrap(),
        }
    }

    fn mixed_events(sprint: &Sprint) -> Vec<CalendarEvent> {
        vec![
            holiday_event(&holiday("Inside", "Australia", date(2024, 3, 5))),
            sprint_event(sprint, None),
            holiday_event(&holiday("Outside", "Australia", date(2024, 4, 1))),
        ]
    }

    #[test]
    fn test_keeps_sprints_and_overlapping_holidays() {
        let sprint = march_sprint();
        let events = mixed_events(&sprint);

        let filtered = filter_overlapping(&events, &[sprint]);
        let titles: Vec<_> = filtered.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Inside", "March"]);
    }

    #[test]
    fn test_bounds_are_inclusive_on_start_date() {
        let sprint = march_sprint();
        let on_start = holiday_event(&holiday("First", "Australia", date(2024, 3, 1)));
        let on_end = holiday_event(&holiday("Last", "Australia", date(2024, 3, 14)));
        let after = holiday_event(&holiday("After", "Australia", date(2024, 3, 15)));
        // A holiday that starts before the sprint but runs into it is not kept.
        let mut straddling = holiday_event(&holiday("Straddle", "Australia", date(2024, 2, 28)));
        straddling.end = date(2024, 3, 3);

        let sprints = [sprint];
        assert!(holiday_overlaps_sprints(&on_start, &sprints));
        assert!(holiday_overlaps_sprints(&on_end, &sprints));
        assert!(!holiday_overlaps_sprints(&after, &sprints));
        assert!(!holiday_overlaps_sprints(&straddling, &sprints));
    }

    #[test]
    fn test_holiday_in_two_sprints_is_kept_once() {
        let first = march_sprint();
        let mut second = march_sprint();
        second.id = 2;
        second.start = date(2024, 3, 4);
        second.end = date(2024, 3, 18);
        let events = vec![holiday_event(&holiday("Both", "Australia", date(2024, 3, 6)))];

        assert_eq!(filter_overlapping(&events, &[first, second]).len(), 1);
    }

    #[test]
    fn test_toggle_back_restores_full_set() {
        let sprint = march_sprint();
        let events = mixed_events(&sprint);
        let original = events.clone();
        let sprints = [sprint];

        let overlapping = select(&events, &sprints, HolidayView::OverlappingOnly);
        assert_eq!(overlapping.len(), 2);

        let all: Vec<CalendarEvent> = select(&events, &sprints, HolidayView::All)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(all, original);
    }

    #[test]
    fn test_no_sprints_keeps_no_holidays() {
        let events = mixed_events(&march_sprint());
        let filtered = filter_overlapping(&events, &[]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].kind(), EventKind::Sprint);
    }

    #[test]
    fn test_absent_members_match_country_ignoring_case() {
        let members = vec![
            TeamMember { name: "Ada".into(), country: "australia".into(), region: "NSW".into() },
            TeamMember { name: "Linus".into(), country: "Finland".into(), region: "Uusimaa".into() },
            TeamMember { name: "Grace".into(), country: "AUSTRALIA".into(), region: "VIC".into() },
        ];
        let away = absent_members(&holiday("Anzac Day", "Australia", date(2024, 4, 25)), &members);
        let names: Vec<_> = away.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[test]
    fn test_view_parse() {
        assert_eq!("overlapping_only".parse::<HolidayView>().unwrap(), HolidayView::OverlappingOnly);
        assert_eq!(HolidayView::default(), HolidayView::All);
    }
}
