pub mod messages;
pub mod orchestrator;
pub mod store;

pub use messages::{AggregationReport, PartialResult, Stage, StageOutcome, StageReport};
pub use orchestrator::{Aggregation, Aggregator, distinct_countries};
pub use store::CalendarStore;
