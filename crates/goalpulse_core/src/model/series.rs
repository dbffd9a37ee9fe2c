//! Derived, ephemeral records produced by the aggregation pipeline.
//!
//! # Invariants
//! - `SeriesPoint::timestamp` is Unix epoch milliseconds.
//! - Values in cumulative series never decrease along a series.
//! - Nothing here references the source hierarchy.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

/// One subtopic transition into `completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEvent {
    pub subtopic_id: String,
    pub topic_id: String,
    /// Key used for per-topic series.
    pub topic_name: String,
    /// Exact completion instant. Sort key only.
    pub timestamp: DateTime<FixedOffset>,
    /// Calendar day extracted from the stored value. Bucketing key.
    pub day: NaiveDate,
}

/// Single-series chart point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub value: u64,
}

impl SeriesPoint {
    pub fn new(timestamp: i64, value: u64) -> Self {
        Self { timestamp, value }
    }
}

/// One tracked entity's cumulative series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedSeries {
    pub series_name: String,
    pub points: Vec<SeriesPoint>,
}

impl NamedSeries {
    /// Final cumulative value, or zero for an empty series.
    pub fn final_value(&self) -> u64 {
        self.points.last().map(|point| point.value).unwrap_or(0)
    }
}

/// Long-form multi-series point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSeriesPoint {
    pub timestamp: i64,
    pub series_name: String,
    pub value: u64,
}

/// Wide-form multi-series output: one column per tracked entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeriesTable {
    pub columns: Vec<String>,
    pub rows: Vec<SeriesRow>,
}

/// One row of a [`SeriesTable`]; `values[i]` belongs to `columns[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesRow {
    pub timestamp: i64,
    pub values: Vec<u64>,
}

/// One bucket of a trailing windowed trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPoint {
    pub window_label: String,
    pub value: u64,
}

/// Goal-level progress triple used by the elapsed-time interpolator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalSpan {
    /// Goal creation instant (C).
    pub created_at: DateTime<FixedOffset>,
    /// Goal last-updated instant (U).
    pub updated_at: DateTime<FixedOffset>,
    /// Completed subtopic count (N).
    pub completed: u64,
}

/// Computed series plus the number of records excluded on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesReport<T> {
    pub series: T,
    /// Records dropped because a timestamp failed to parse.
    pub skipped_records: usize,
}
