use serde::Serialize;
use tracing::debug;

use super::messages::PartialResult;
use crate::calendar::overlap::{self, HolidayView};
use crate::calendar::velocity::{self, VelocityWindow};
use crate::core::models::{CalendarEvent, Holiday, Sprint, TeamMember};


/// Owner of the aggregated collections. Collections only grow, and only
/// through [`CalendarStore::apply`]; everything else is a read.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CalendarStore {
    team_members: Vec<TeamMember>,
    sprints: Vec<Sprint>,
    events: Vec<CalendarEvent>,
    #[serde(skip)]
    view: HolidayView,
    #[serde(skip)]
    window: VelocityWindow,
}

impl CalendarStore {
    pub fn new(window: VelocityWindow) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, partial: PartialResult) {
        match partial {
            PartialResult::TeamMembers(members) => {
                debug!("Merging {} team members", members.len());
                self.team_members.extend(members);
            }
            PartialResult::Holidays { country, events } => {
                debug!("Merging {} holiday events for {}", events.len(), country);
                self.events.extend(events);
            }
            PartialResult::Sprints { sprints, events } => {
                debug!("Merging {} sprints", sprints.len());
                self.sprints.extend(sprints);
                self.events.extend(events);
            }
            PartialResult::Stage(_) => {}
        }
    }

    pub fn team_members(&self) -> &[TeamMember] {
        &self.team_members
    }

    pub fn sprints(&self) -> &[Sprint] {
        &self.sprints
    }

    /// The full, unfiltered event set.
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn holiday_view(&self) -> HolidayView {
        self.view
    }

    pub fn set_holiday_view(&mut self, view: HolidayView) {
        self.view = view;
    }

    /// The events to display under the current holiday view.
    pub fn visible_events(&self) -> Vec<&CalendarEvent> {
        overlap::select(&self.events, &self.sprints, self.view)
    }

    pub fn filter_overlapping(&self) -> Vec<&CalendarEvent> {
        overlap::filter_overlapping(&self.events, &self.sprints)
    }

    pub fn velocity(&self, sprint_index: usize) -> f64 {
        velocity::velocity(&self.sprints, sprint_index, self.window)
    }

    pub fn velocity_for_event(&self, event: &CalendarEvent) -> f64 {
        velocity::velocity_for_event(&self.sprints, event, self.window)
    }

    pub fn absent_members(&self, holiday: &Holiday) -> Vec<&TeamMember> {
        overlap::absent_members(holiday, &self.team_members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::materializer::{holiday_event, sprint_events};
    use crate::core::models::{EventKind, StoryTotal};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sprint(id: i64, start: NaiveDate, end: NaiveDate, total: i64) -> Sprint {
        Sprint {
            id,
            name: format!("Sprint {id}"),
            start,
            end,
            issues: vec![],
            story_total: StoryTotal::Points(total),
        }
    }

    fn populated() -> CalendarStore {
        let sprints = vec![
            sprint(1, date(3, 1), date(3, 15), 10),
            sprint(2, date(3, 15), date(3, 29), 20),
        ];
        let holidays = vec![
            Holiday { name: "Canberra Day".into(), country: "Australia".into(), start: date(3, 11), end: date(3, 12) },
            Holiday { name: "Easter Monday".into(), country: "Australia".into(), start: date(4, 1), end: date(4, 2) },
        ];

        let mut store = CalendarStore::new(VelocityWindow::default());
        store.apply(PartialResult::Holidays {
            country: "Australia".into(),
            events: holidays.iter().map(holiday_event).collect(),
        });
        store.apply(PartialResult::Sprints {
            events: sprint_events(&sprints, None),
            sprints,
        });
        store.apply(PartialResult::TeamMembers(vec![TeamMember {
            name: "Ada".into(),
            country: "australia".into(),
            region: "ACT".into(),
        }]));
        store
    }

    #[test]
    fn test_apply_appends() {
        let store = populated();
        assert_eq!(store.events().len(), 4);
        assert_eq!(store.sprints().len(), 2);
        assert_eq!(store.team_members().len(), 1);
    }

    #[test]
    fn test_toggle_between_views() {
        let mut store = populated();
        let full: Vec<CalendarEvent> = store.events().to_vec();
        assert_eq!(store.visible_events().len(), 4);

        store.set_holiday_view(HolidayView::OverlappingOnly);
        let visible = store.visible_events();
        assert_eq!(visible.len(), 3);
        assert!(visible.iter().all(|e| e.title != "Easter Monday"));

        store.set_holiday_view(HolidayView::All);
        let restored: Vec<CalendarEvent> = store.visible_events().into_iter().cloned().collect();
        assert_eq!(restored, full);
        assert_eq!(store.events(), full.as_slice());
    }

    #[test]
    fn test_velocity_queries() {
        let store = populated();
        assert_eq!(store.velocity(0), 0.0);
        assert_eq!(store.velocity(1), 10.0);

        let second = store
            .events()
            .iter()
            .find(|e| e.kind() == EventKind::Sprint && e.title == "Sprint 2")
            .unwrap();
        assert_eq!(store.velocity_for_event(second), 10.0);
    }

    #[test]
    fn test_absent_members_for_holiday() {
        let store = populated();
        let holiday = store.events()[0].holiday().unwrap().clone();
        assert_eq!(store.absent_members(&holiday).len(), 1);
    }
}
