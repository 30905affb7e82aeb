use std::sync::Arc;

use serde::Serialize;
use sprint_calendar::{
    AggregationReport, Aggregator, CalendarEvent, HolidayView, HttpSource, SprintCalendarConfig,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Serialize)]
struct SprintVelocity<'a> {
    sprint: &'a str,
    story_total: Option<i64>,
    velocity: f64,
}

#[derive(Serialize)]
struct Output<'a> {
    view: HolidayView,
    events: Vec<&'a CalendarEvent>,
    velocities: Vec<SprintVelocity<'a>>,
    report: &'a AggregationReport,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("sprint_calendar=info".parse()?))
        .init();

    let mut config_path = None;
    let mut view = HolidayView::All;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--overlapping-only" => view = HolidayView::OverlappingOnly,
            path => config_path = Some(path.to_string()),
        }
    }

    let config = match config_path {
        Some(path) => SprintCalendarConfig::from_file(&path)?,
        None => SprintCalendarConfig::from_env(),
    };
    info!("Using calendar API at {}", config.api_base_url);

    let source = Arc::new(HttpSource::from_config(&config)?);
    let aggregation = Aggregator::from_config(source, &config).run().await;

    let mut store = aggregation.store;
    store.set_holiday_view(view);

    let velocities = store
        .sprints()
        .iter()
        .enumerate()
        .map(|(index, sprint)| SprintVelocity {
            sprint: &sprint.name,
            story_total: sprint.story_total.points(),
            velocity: store.velocity(index),
        })
        .collect();

    let output = Output {
        view,
        events: store.visible_events(),
        velocities,
        report: &aggregation.report,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
