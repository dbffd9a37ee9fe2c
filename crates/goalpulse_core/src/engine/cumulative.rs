//! Cumulative series builder.
//!
//! # Responsibility
//! - Turn completion events into non-decreasing cumulative counts.
//! - Support one implicit whole-goal entity or one entity per topic name.
//!
//! # Invariants
//! - Events are ordered by exact instant with a stable sort, so ties keep
//!   input order and are each counted individually.
//! - On the event axis every series starts at `first event - 1 day` with 0.
//! - Entities with zero events are omitted. Filtering short series for display
//!   is the caller's job.

use crate::dates::{local_midnight, to_epoch_millis};
use crate::model::series::{
    CompletionEvent, MultiSeriesPoint, NamedSeries, SeriesPoint, SeriesRow, SeriesTable,
};
use chrono::{FixedOffset, NaiveDate};
use std::collections::{HashMap, HashSet};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Time axis a series is sampled on.
#[derive(Debug, Clone, Copy)]
pub enum SeriesAxis<'a> {
    /// One point per event in time order, after a synthetic zero point.
    Events,
    /// One point per listed calendar day, counting events up to that day.
    Days(&'a [NaiveDate]),
}

/// Returns events ordered by exact instant, ties in input order.
pub fn sort_events(events: &[CompletionEvent]) -> Vec<&CompletionEvent> {
    let mut sorted: Vec<&CompletionEvent> = events.iter().collect();
    sorted.sort_by_key(|event| event.timestamp);
    sorted
}

/// Builds the whole-goal cumulative series.
pub fn goal_series(
    events: &[CompletionEvent],
    axis: SeriesAxis<'_>,
    tz: &FixedOffset,
) -> Vec<SeriesPoint> {
    match axis {
        SeriesAxis::Events => event_axis_series(events),
        SeriesAxis::Days(days) => day_axis_series(events.iter(), days, tz),
    }
}

/// Builds one cumulative series per topic name.
///
/// `tracked` fixes which topics appear and in what order; when `None`, topics
/// appear in order of their first completion.
pub fn topic_series(
    events: &[CompletionEvent],
    tracked: Option<&[String]>,
    axis: SeriesAxis<'_>,
    tz: &FixedOffset,
) -> Vec<NamedSeries> {
    let sorted = sort_events(events);
    let Some(first) = sorted.first() else {
        return Vec::new();
    };
    let start = to_epoch_millis(&first.timestamp) - DAY_MILLIS;
    let keys = tracked_keys(&sorted, tracked);

    let mut grouped: Vec<Vec<&CompletionEvent>> = vec![Vec::new(); keys.len()];
    {
        let index: HashMap<&str, usize> = keys
            .iter()
            .enumerate()
            .map(|(position, key)| (key.as_str(), position))
            .collect();
        for event in &sorted {
            if let Some(position) = index.get(event.topic_name.as_str()) {
                grouped[*position].push(*event);
            }
        }
    }

    keys.into_iter()
        .zip(grouped)
        .filter(|(_, topic_events)| !topic_events.is_empty())
        .map(|(series_name, topic_events)| {
            let points = match axis {
                SeriesAxis::Events => {
                    let mut points = Vec::with_capacity(topic_events.len() + 1);
                    points.push(SeriesPoint::new(start, 0));
                    points.extend(topic_events.iter().enumerate().map(|(count, event)| {
                        SeriesPoint::new(to_epoch_millis(&event.timestamp), count as u64 + 1)
                    }));
                    points
                }
                SeriesAxis::Days(days) => day_axis_series(topic_events.into_iter(), days, tz),
            };
            NamedSeries {
                series_name,
                points,
            }
        })
        .collect()
}

/// Flattens named series into long-form points ordered by timestamp.
///
/// Points sharing a timestamp keep series order, then point order.
pub fn series_rows(series: &[NamedSeries]) -> Vec<MultiSeriesPoint> {
    let mut rows: Vec<MultiSeriesPoint> = series
        .iter()
        .flat_map(|named| {
            named.points.iter().map(|point| MultiSeriesPoint {
                timestamp: point.timestamp,
                series_name: named.series_name.clone(),
                value: point.value,
            })
        })
        .collect();
    rows.sort_by_key(|row| row.timestamp);
    rows
}

/// Pivots named series into one column per entity.
///
/// Each row carries every column's latest value. Points of different columns
/// at the same timestamp share a row; repeated points of one column at the
/// same timestamp open a new row so no step is lost.
pub fn series_table(series: &[NamedSeries]) -> SeriesTable {
    let columns: Vec<String> = series.iter().map(|named| named.series_name.clone()).collect();
    let mut merged: Vec<(i64, usize, u64)> = series
        .iter()
        .enumerate()
        .flat_map(|(column, named)| {
            named
                .points
                .iter()
                .map(move |point| (point.timestamp, column, point.value))
        })
        .collect();
    merged.sort_by_key(|(timestamp, _, _)| *timestamp);

    let mut current = vec![0_u64; columns.len()];
    let mut touched = vec![false; columns.len()];
    let mut rows: Vec<SeriesRow> = Vec::new();
    for (timestamp, column, value) in merged {
        current[column] = value;
        match rows
            .last_mut()
            .filter(|row| row.timestamp == timestamp && !touched[column])
        {
            Some(row) => row.values[column] = value,
            None => {
                touched.iter_mut().for_each(|flag| *flag = false);
                rows.push(SeriesRow {
                    timestamp,
                    values: current.clone(),
                });
            }
        }
        touched[column] = true;
    }

    SeriesTable { columns, rows }
}

fn event_axis_series(events: &[CompletionEvent]) -> Vec<SeriesPoint> {
    let sorted = sort_events(events);
    let Some(first) = sorted.first() else {
        return Vec::new();
    };

    let mut points = Vec::with_capacity(sorted.len() + 1);
    points.push(SeriesPoint::new(
        to_epoch_millis(&first.timestamp) - DAY_MILLIS,
        0,
    ));
    points.extend(sorted.iter().enumerate().map(|(index, event)| {
        SeriesPoint::new(to_epoch_millis(&event.timestamp), index as u64 + 1)
    }));
    points
}

fn day_axis_series<'e>(
    events: impl Iterator<Item = &'e CompletionEvent>,
    days: &[NaiveDate],
    tz: &FixedOffset,
) -> Vec<SeriesPoint> {
    let mut event_days: Vec<NaiveDate> = events.map(|event| event.day).collect();
    event_days.sort_unstable();

    days.iter()
        .map(|day| {
            let count = event_days.partition_point(|event_day| event_day <= day);
            SeriesPoint::new(to_epoch_millis(&local_midnight(*day, tz)), count as u64)
        })
        .collect()
}

fn tracked_keys(sorted: &[&CompletionEvent], tracked: Option<&[String]>) -> Vec<String> {
    let candidates: Vec<&str> = match tracked {
        Some(tracked) => tracked.iter().map(String::as_str).collect(),
        None => sorted.iter().map(|event| event.topic_name.as_str()).collect(),
    };
    let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{series_table, sort_events};
    use crate::model::series::{CompletionEvent, NamedSeries, SeriesPoint};
    use chrono::DateTime;

    fn event(id: &str, at: &str) -> CompletionEvent {
        let timestamp = DateTime::parse_from_rfc3339(at).unwrap();
        CompletionEvent {
            subtopic_id: id.into(),
            topic_id: "t".into(),
            topic_name: "T".into(),
            timestamp,
            day: timestamp.date_naive(),
        }
    }

    #[test]
    fn sort_is_stable_for_identical_instants() {
        let events = vec![
            event("late", "2024-02-03T00:00:00Z"),
            event("a", "2024-02-01T00:00:00Z"),
            event("b", "2024-02-01T00:00:00Z"),
        ];
        let ids: Vec<&str> = sort_events(&events)
            .iter()
            .map(|event| event.subtopic_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "late"]);
    }

    #[test]
    fn table_splits_repeated_column_points_at_one_instant() {
        let series = vec![
            NamedSeries {
                series_name: "A".into(),
                points: vec![SeriesPoint::new(0, 0), SeriesPoint::new(5, 1), SeriesPoint::new(5, 2)],
            },
            NamedSeries {
                series_name: "B".into(),
                points: vec![SeriesPoint::new(0, 0), SeriesPoint::new(5, 1)],
            },
        ];

        let table = series_table(&series);
        assert_eq!(table.columns, vec!["A".to_string(), "B".to_string()]);
        let rows: Vec<(i64, Vec<u64>)> = table
            .rows
            .into_iter()
            .map(|row| (row.timestamp, row.values))
            .collect();
        assert_eq!(
            rows,
            vec![(0, vec![0, 0]), (5, vec![1, 0]), (5, vec![2, 1])]
        );
    }
}
