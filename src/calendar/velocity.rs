use crate::core::config::DEFAULT_VELOCITY_WINDOW;
use crate::core::models::{CalendarEvent, Sprint};


/// How many sprints, counted backwards by position in the sprint sequence,
/// feed the trailing average. Position is the source order of the sprint
/// feed, not a date comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelocityWindow(usize);

impl VelocityWindow {
    pub fn new(sprints: usize) -> Self {
        Self(sprints)
    }

    pub fn size(&self) -> usize {
        self.0
    }

    /// Positions of the sprints preceding `index` that exist in the sequence.
    pub fn preceding(&self, index: usize) -> std::ops::Range<usize> {
        index.saturating_sub(self.0)..index
    }
}

impl Default for VelocityWindow {
    fn default() -> Self {
        Self(DEFAULT_VELOCITY_WINDOW)
    }
}


/// Trailing average of the story totals of up to `window` sprints before
/// `index`, rounded to two decimals. The divisor is the number of preceding
/// sprints that exist, so early sprints are not dragged down. 0 when nothing
/// precedes `index` or `index` is out of bounds; NaN if any averaged total is
/// poisoned.
pub fn velocity(sprints: &[Sprint], index: usize, window: VelocityWindow) -> f64 {
    if index >= sprints.len() {
        return 0.0;
    }

    let preceding = &sprints[window.preceding(index)];
    if preceding.is_empty() {
        return 0.0;
    }

    let total: f64 = preceding.iter().map(|s| s.story_total.as_f64()).sum();
    round_to_hundredths(total / preceding.len() as f64)
}


/// Velocity for the sprint behind a calendar event; 0 for holiday events and
/// for sprints not present in `sprints`. The sprint is matched as a whole, so a
/// feed that repeats an id still resolves each event to its own position.
pub fn velocity_for_event(sprints: &[Sprint], event: &CalendarEvent, window: VelocityWindow) -> f64 {
    event
        .sprint()
        .and_then(|sprint| sprints.iter().position(|s| s == sprint))
        .map(|index| velocity(sprints, index, window))
        .unwrap_or(0.0)
}


fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
