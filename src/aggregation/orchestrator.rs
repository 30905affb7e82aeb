//! Runs the two fetch pipelines and folds their results into a [`CalendarStore`].
//!
//! Holidays: team members, then one task per distinct member country.
//! Sprints: issues, then sprints, then the issue join.
//!
//! The pipelines run side by side and never touch the store. Each step posts a
//! [`PartialResult`] on a channel; the aggregator loop is the only writer.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error, info, warn};

use super::messages::{AggregationReport, PartialResult, Stage, StageOutcome, StageReport};
use super::store::CalendarStore;
use crate::calendar::joiner::{join_issues, orphaned_issues};
use crate::calendar::materializer::{holiday_events, sprint_events};
use crate::calendar::velocity::VelocityWindow;
use crate::core::config::{SprintCalendarConfig, StoryPointsPolicy};
use crate::core::models::{EventColor, TeamMember};
use crate::core::normalizer::{
    normalize_batch, normalize_holiday, normalize_issue, normalize_sprint, normalize_team_member,
};
use crate::sources::base::{Credentials, DataSource};


#[derive(Debug)]
pub struct Aggregation {
    pub store: CalendarStore,
    pub report: AggregationReport,
}


pub struct Aggregator {
    source: Arc<dyn DataSource>,
    credentials: Credentials,
    policy: StoryPointsPolicy,
    window: VelocityWindow,
    sprint_color: Option<EventColor>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn DataSource>, credentials: Credentials) -> Self {
        Self {
            source,
            credentials,
            policy: StoryPointsPolicy::default(),
            window: VelocityWindow::default(),
            sprint_color: None,
        }
    }

    pub fn from_config(source: Arc<dyn DataSource>, config: &SprintCalendarConfig) -> Self {
        let credentials = Credentials::new(
            config.email.clone(),
            config.api_key.clone().unwrap_or_default(),
        );

        Self::new(source, credentials)
            .with_policy(config.story_points_policy)
            .with_window(VelocityWindow::new(config.velocity_window))
            .with_sprint_color(EventColor::solid(config.sprint_color.clone()))
    }

    pub fn with_policy(mut self, policy: StoryPointsPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_window(mut self, window: VelocityWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_sprint_color(mut self, color: EventColor) -> Self {
        self.sprint_color = Some(color);
        self
    }

    pub async fn run(&self) -> Aggregation {
        info!("Aggregation started (source={})", self.source.source_name());

        let (tx, mut rx) = mpsc::unbounded_channel();

        let holidays = tokio::spawn(holiday_pipeline(self.source.clone(), tx.clone()));
        let sprints = tokio::spawn(sprint_pipeline(
            self.source.clone(),
            self.credentials.clone(),
            self.policy,
            self.sprint_color.clone(),
            tx,
        ));

        let mut store = CalendarStore::new(self.window);
        let mut report = AggregationReport::default();

        // Ends once both pipelines and every holiday task have dropped their sender.
        while let Some(partial) = rx.recv().await {
            match partial {
                PartialResult::Stage(stage_report) => {
                    debug!("Stage {} finished: {:?}", stage_report.stage, stage_report.outcome);
                    report.record(stage_report);
                }
                data => store.apply(data),
            }
        }

        for (name, handle) in [("holidays", holidays), ("sprints", sprints)] {
            if let Err(e) = handle.await {
                error!("{} pipeline aborted: {}", name, e);
                report.record(StageReport {
                    stage: Stage::Pipeline { name: name.to_string() },
                    outcome: StageOutcome::Failed { error: e.to_string() },
                });
            }
        }

        info!(
            "Aggregation finished: {} events, {} sprints, {} team members, {} failed stages",
            store.events().len(),
            store.sprints().len(),
            store.team_members().len(),
            report.failures().count()
        );

        Aggregation { store, report }
    }
}


/// Distinct countries in first-seen order and spelling, compared without case.
pub fn distinct_countries(members: &[TeamMember]) -> Vec<String> {
    let mut seen = HashSet::new();
    members
        .iter()
        .filter(|m| seen.insert(m.country.to_lowercase()))
        .map(|m| m.country.clone())
        .collect()
}

fn post(tx: &UnboundedSender<PartialResult>, partial: PartialResult) {
    if tx.send(partial).is_err() {
        debug!("Aggregator gone, dropping partial result");
    }
}

async fn holiday_pipeline(source: Arc<dyn DataSource>, tx: UnboundedSender<PartialResult>) {
    let raw = match source.fetch_team_members().await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Team member fetch failed, skipping holidays: {}", e);
            post(&tx, PartialResult::stage(Stage::TeamMembers, StageOutcome::Failed { error: e.to_string() }));
            return;
        }
    };

    let batch = normalize_batch(&raw, normalize_team_member);
    let countries = distinct_countries(&batch.entities);
    info!(
        "Loaded {} team members across {} countries",
        batch.entities.len(),
        countries.len()
    );
    post(
        &tx,
        PartialResult::stage(
            Stage::TeamMembers,
            StageOutcome::completed(batch.entities.len(), batch.rejected_count()),
        ),
    );
    post(&tx, PartialResult::TeamMembers(batch.entities));

    let handles: Vec<_> = countries
        .into_iter()
        .map(|country| tokio::spawn(country_holidays(source.clone(), country, tx.clone())))
        .collect();
    drop(tx);

    for result in join_all(handles).await {
        if let Err(e) = result {
            error!("Holiday task aborted: {}", e);
        }
    }
}

async fn country_holidays(source: Arc<dyn DataSource>, country: String, tx: UnboundedSender<PartialResult>) {
    let stage = Stage::Holidays {
        country: country.clone(),
    };

    let raw = match source.fetch_holidays(&country.to_lowercase()).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Holiday fetch for {} failed: {}", country, e);
            post(&tx, PartialResult::stage(stage, StageOutcome::Failed { error: e.to_string() }));
            return;
        }
    };

    let batch = normalize_batch(&raw, |record| normalize_holiday(record, &country));
    let events = holiday_events(&batch.entities);
    debug!("{} holidays for {}", events.len(), country);

    post(
        &tx,
        PartialResult::stage(
            stage,
            StageOutcome::completed(batch.entities.len(), batch.rejected_count()),
        ),
    );
    post(&tx, PartialResult::Holidays { country, events });
}

async fn sprint_pipeline(
    source: Arc<dyn DataSource>,
    credentials: Credentials,
    policy: StoryPointsPolicy,
    sprint_color: Option<EventColor>,
    tx: UnboundedSender<PartialResult>,
) {
    // Sprints load whatever happens to the issue fetch; they just carry no issues.
    let issues = match source.fetch_issues(&credentials).await {
        Ok(fetched) if fetched.auth.is_accepted() => {
            let batch = normalize_batch(&fetched.issues, normalize_issue);
            let incomplete = batch.entities.iter().filter(|issue| issue.id.is_none()).count();
            post(
                &tx,
                PartialResult::stage(
                    Stage::Issues,
                    StageOutcome::Completed {
                        records: batch.entities.len(),
                        rejected: batch.rejected_count(),
                        incomplete,
                    },
                ),
            );
            batch.entities
        }
        Ok(_) => {
            error!("Issue tracker authentication failed, sprints will have no issues");
            post(&tx, PartialResult::stage(Stage::Issues, StageOutcome::AuthenticationFailed));
            Vec::new()
        }
        Err(e) => {
            warn!("Issue fetch failed, sprints will have no issues: {}", e);
            post(&tx, PartialResult::stage(Stage::Issues, StageOutcome::Failed { error: e.to_string() }));
            Vec::new()
        }
    };

    let raw = match source.fetch_sprints().await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Sprint fetch failed: {}", e);
            post(&tx, PartialResult::stage(Stage::Sprints, StageOutcome::Failed { error: e.to_string() }));
            return;
        }
    };

    let batch = normalize_batch(&raw, normalize_sprint);
    let sprints = join_issues(&issues, &batch.entities, policy);
    let orphaned = orphaned_issues(&issues, &sprints).len();
    if orphaned > 0 {
        debug!("{} issues reference no known sprint", orphaned);
    }
    let events = sprint_events(&sprints, sprint_color.as_ref());
    info!("Loaded {} sprints from {} issues", sprints.len(), issues.len());

    post(
        &tx,
        PartialResult::stage(
            Stage::Sprints,
            StageOutcome::completed(sprints.len(), batch.rejected_count()),
        ),
    );
    post(&tx, PartialResult::Sprints { sprints, events });
}
