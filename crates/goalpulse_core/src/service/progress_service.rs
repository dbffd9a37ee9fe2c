//! Progress view use-case service.
//!
//! # Responsibility
//! - Fetch goal snapshots from a [`GoalSource`] and run the aggregation
//!   pipeline for each chart view.
//! - Report how many malformed records were skipped alongside every series.
//!
//! # Invariants
//! - `today` is always supplied by the caller; no clock is read here.
//! - Only source failures and unknown goals surface as errors. Malformed
//!   hierarchy data never does.

use crate::config::{ConfigError, EngineConfig};
use crate::engine::cumulative::{goal_series, series_table, topic_series, SeriesAxis};
use crate::engine::normalizer::{goal_span, normalize_goal, NormalizedGoal};
use crate::engine::window::{
    aggregate_events, aggregate_spans, daily_contributions, trailing_windows, Granularity,
};
use crate::model::goal::{Goal, GoalId};
use crate::model::series::{
    CompletionEvent, GoalSpan, NamedSeries, SeriesPoint, SeriesReport, SeriesTable, WindowPoint,
};
use crate::repo::goal_source::{GoalSource, SourceError};
use chrono::{FixedOffset, NaiveDate};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from progress view operations.
#[derive(Debug)]
pub enum ProgressServiceError {
    /// Engine configuration failed validation.
    InvalidConfig(ConfigError),
    /// Requested goal does not exist.
    GoalNotFound(GoalId),
    /// Storage collaborator failure.
    Source(SourceError),
}

impl Display for ProgressServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(err) => write!(f, "{err}"),
            Self::GoalNotFound(id) => write!(f, "goal not found: {id}"),
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProgressServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            Self::Source(err) => Some(err),
            Self::GoalNotFound(_) => None,
        }
    }
}

impl From<SourceError> for ProgressServiceError {
    fn from(value: SourceError) -> Self {
        match value {
            SourceError::NotFound(goal_id) => Self::GoalNotFound(goal_id),
            other => Self::Source(other),
        }
    }
}

impl From<ConfigError> for ProgressServiceError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

/// Progress view service facade.
pub struct ProgressService<S: GoalSource> {
    source: S,
    config: EngineConfig,
    tz: FixedOffset,
}

impl<S: GoalSource> ProgressService<S> {
    /// Creates service from a goal source and validated configuration.
    pub fn new(source: S, config: EngineConfig) -> Result<Self, ProgressServiceError> {
        config.validate()?;
        let tz = config.local_offset()?;
        Ok(Self { source, config, tz })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whole-goal cumulative series on the event axis.
    pub fn goal_cumulative(
        &self,
        goal_id: &str,
    ) -> Result<SeriesReport<Vec<SeriesPoint>>, ProgressServiceError> {
        let normalized = normalize_goal(&self.load_goal(goal_id)?, &self.tz);
        let series = goal_series(&normalized.events, SeriesAxis::Events, &self.tz);
        info!(
            "event=goal_cumulative module=service status=ok goal_id={} points={} skipped={}",
            goal_id,
            series.len(),
            normalized.skipped_records
        );
        Ok(SeriesReport {
            series,
            skipped_records: normalized.skipped_records,
        })
    }

    /// Per-topic stepped series on the event axis, in hierarchy topic order.
    pub fn topic_progress(
        &self,
        goal_id: &str,
    ) -> Result<SeriesReport<Vec<NamedSeries>>, ProgressServiceError> {
        let goal = self.load_goal(goal_id)?;
        let normalized = normalize_goal(&goal, &self.tz);
        let tracked = topic_names(&goal);
        let series = topic_series(
            &normalized.events,
            Some(tracked.as_slice()),
            SeriesAxis::Events,
            &self.tz,
        );
        info!(
            "event=topic_progress module=service status=ok goal_id={} series={} skipped={}",
            goal_id,
            series.len(),
            normalized.skipped_records
        );
        Ok(SeriesReport {
            series,
            skipped_records: normalized.skipped_records,
        })
    }

    /// Per-topic stepped series pivoted to one column per topic.
    pub fn topic_progress_table(
        &self,
        goal_id: &str,
    ) -> Result<SeriesReport<SeriesTable>, ProgressServiceError> {
        let report = self.topic_progress(goal_id)?;
        Ok(SeriesReport {
            series: series_table(&report.series),
            skipped_records: report.skipped_records,
        })
    }

    /// Cumulative completions across the owner's goals for the trailing days.
    pub fn owner_daily_trend(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> Result<SeriesReport<Vec<WindowPoint>>, ProgressServiceError> {
        let (events, skipped_records) = self.owner_events(owner_id)?;
        let windows = trailing_windows(today, self.config.daily_window_count, Granularity::Day);
        Ok(SeriesReport {
            series: aggregate_events(&events, &windows),
            skipped_records,
        })
    }

    /// Completions per day for the contribution heat-map.
    pub fn owner_heatmap(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> Result<SeriesReport<Vec<WindowPoint>>, ProgressServiceError> {
        let (events, skipped_records) = self.owner_events(owner_id)?;
        let windows =
            trailing_windows(today, self.config.heatmap_window_count, Granularity::Day);
        Ok(SeriesReport {
            series: daily_contributions(&events, &windows),
            skipped_records,
        })
    }

    /// Per-topic cumulative area series over the trailing days.
    pub fn owner_topic_area(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> Result<SeriesReport<Vec<NamedSeries>>, ProgressServiceError> {
        let (events, skipped_records) = self.owner_events(owner_id)?;
        let days: Vec<NaiveDate> =
            trailing_windows(today, self.config.daily_window_count, Granularity::Day)
                .into_iter()
                .map(|window| window.start)
                .collect();
        Ok(SeriesReport {
            series: topic_series(&events, None, SeriesAxis::Days(&days), &self.tz),
            skipped_records,
        })
    }

    /// Interpolated completions across the owner's goals per trailing month.
    pub fn owner_monthly_trend(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> Result<SeriesReport<Vec<WindowPoint>>, ProgressServiceError> {
        let goals = self.source.goals_for_owner(owner_id)?;
        let mut spans: Vec<GoalSpan> = Vec::with_capacity(goals.len());
        let mut skipped_records = 0_usize;
        for goal in &goals {
            let normalized = normalize_goal(goal, &self.tz);
            match goal_span(goal, normalized.completed_subtopics, &self.tz) {
                Some(span) => spans.push(span),
                None => {
                    skipped_records += 1;
                    warn!(
                        "event=goal_span module=service status=warn goal_id={} reason=invalid_timestamp",
                        goal.id
                    );
                }
            }
        }

        let windows =
            trailing_windows(today, self.config.monthly_window_count, Granularity::Month);
        info!(
            "event=monthly_trend module=service status=ok goals={} skipped={}",
            spans.len(),
            skipped_records
        );
        Ok(SeriesReport {
            series: aggregate_spans(&spans, &windows, &self.tz),
            skipped_records,
        })
    }

    fn load_goal(&self, goal_id: &str) -> Result<Goal, ProgressServiceError> {
        self.source
            .goal(goal_id)?
            .ok_or_else(|| ProgressServiceError::GoalNotFound(goal_id.to_string()))
    }

    fn owner_events(
        &self,
        owner_id: &str,
    ) -> Result<(Vec<CompletionEvent>, usize), ProgressServiceError> {
        let goals = self.source.goals_for_owner(owner_id)?;
        let normalized: Vec<NormalizedGoal> = goals
            .iter()
            .map(|goal| normalize_goal(goal, &self.tz))
            .collect();
        let skipped: usize = normalized.iter().map(|goal| goal.skipped_records).sum();
        let events: Vec<CompletionEvent> = normalized
            .into_iter()
            .flat_map(|goal| goal.events)
            .collect();
        Ok((events, skipped))
    }
}

fn topic_names(goal: &Goal) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    goal.categories
        .iter()
        .flat_map(|category| category.topics.iter())
        .filter(|topic| seen.insert(topic.name.as_str()))
        .map(|topic| topic.name.clone())
        .collect()
}
