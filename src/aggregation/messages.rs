use std::fmt;

use serde::Serialize;

use crate::core::models::{CalendarEvent, Sprint, TeamMember};


#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    TeamMembers,
    Holidays { country: String },
    Issues,
    Sprints,
    Pipeline { name: String },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamMembers => write!(f, "team members"),
            Self::Holidays { country } => write!(f, "holidays ({country})"),
            Self::Issues => write!(f, "issues"),
            Self::Sprints => write!(f, "sprints"),
            Self::Pipeline { name } => write!(f, "{name} pipeline"),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    /// `rejected` records were skipped; `incomplete` ones were kept with a defect.
    Completed {
        records: usize,
        rejected: usize,
        incomplete: usize,
    },
    AuthenticationFailed,
    Failed { error: String },
}

impl StageOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Completed { .. })
    }

    pub fn completed(records: usize, rejected: usize) -> Self {
        Self::Completed {
            records,
            rejected,
            incomplete: 0,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
}


/// What a pipeline task hands to the aggregator loop when one of its steps finishes.
#[derive(Debug)]
pub enum PartialResult {
    TeamMembers(Vec<TeamMember>),
    Holidays {
        country: String,
        events: Vec<CalendarEvent>,
    },
    Sprints {
        sprints: Vec<Sprint>,
        events: Vec<CalendarEvent>,
    },
    Stage(StageReport),
}

impl PartialResult {
    pub fn stage(stage: Stage, outcome: StageOutcome) -> Self {
        Self::Stage(StageReport { stage, outcome })
    }
}


/// Stage outcomes in the order they were received.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregationReport {
    pub stages: Vec<StageReport>,
}

impl AggregationReport {
    pub fn record(&mut self, report: StageReport) {
        self.stages.push(report);
    }

    pub fn outcome(&self, stage: &Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|r| &r.stage == stage)
            .map(|r| &r.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StageReport> {
        self.stages.iter().filter(|r| r.outcome.is_failure())
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}
