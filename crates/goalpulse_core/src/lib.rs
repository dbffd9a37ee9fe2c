//! Goal progress aggregation engine.
//! Turns goal hierarchy snapshots into chart-ready time series.

pub mod config;
pub mod dates;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, EngineConfig};
pub use dates::{calendar_day, normalize_instant, normalize_timestamp, parse_instant, DateSemantic};
pub use engine::cumulative::{goal_series, series_rows, series_table, topic_series, SeriesAxis};
pub use engine::interpolate::{interpolate_combined, interpolate_completed};
pub use engine::normalizer::{goal_span, normalize_goal, NormalizedGoal};
pub use engine::window::{
    aggregate_events, aggregate_spans, daily_contributions, trailing_windows, Granularity, Window,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::goal::{Category, Goal, GoalId, Subtopic, SubtopicStatus, Topic};
pub use model::series::{
    CompletionEvent, GoalSpan, MultiSeriesPoint, NamedSeries, SeriesPoint, SeriesReport,
    SeriesRow, SeriesTable, WindowPoint,
};
pub use repo::goal_source::{GoalSource, InMemoryGoalSource, SourceError, SourceResult};
pub use service::progress_service::{ProgressService, ProgressServiceError};

/// Returns the engine crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
