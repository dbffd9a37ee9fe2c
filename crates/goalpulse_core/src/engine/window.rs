//! Trailing calendar windows and windowed aggregation.
//!
//! # Responsibility
//! - Compute fixed trailing day/month windows anchored on an explicit `today`.
//! - Reduce events or goal spans to exactly one value per window.
//!
//! # Invariants
//! - Windows are returned oldest first; the last window contains `today`.
//! - Month stepping uses calendar months, not fixed-length blocks.
//! - Aggregations return exactly one point per window, including empty ones.
//! - Cumulative values are evaluated at each window's exclusive end, so empty
//!   windows carry the previous value forward.

use crate::dates::local_midnight;
use crate::engine::interpolate::interpolate_combined;
use crate::model::series::{CompletionEvent, GoalSpan, WindowPoint};
use chrono::{Datelike, Days, FixedOffset, Months, NaiveDate};

/// Calendar step between consecutive windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
}

/// One calendar bucket `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// `YYYY-MM-DD` for days, `YYYY-MM` for months.
    pub label: String,
    pub start: NaiveDate,
    /// Exclusive end.
    pub end: NaiveDate,
}

/// Builds `count` trailing windows ending with the one containing `today`.
///
/// Windows are returned oldest first. When `count` reaches past the earliest
/// representable date, only the windows that fit are returned, so the result
/// may be shorter than `count` but never has gaps.
pub fn trailing_windows(today: NaiveDate, count: usize, granularity: Granularity) -> Vec<Window> {
    let limit = u32::try_from(count).unwrap_or(u32::MAX);
    let mut windows: Vec<Window> = (0..limit)
        .map_while(|steps_back| window_before(today, steps_back, granularity))
        .collect();
    windows.reverse();
    windows
}

fn window_before(today: NaiveDate, steps_back: u32, granularity: Granularity) -> Option<Window> {
    match granularity {
        Granularity::Day => {
            let start = today.checked_sub_days(Days::new(u64::from(steps_back)))?;
            Some(Window {
                label: start.format("%Y-%m-%d").to_string(),
                start,
                end: start.checked_add_days(Days::new(1))?,
            })
        }
        Granularity::Month => {
            let anchor = today.with_day(1)?;
            let start = anchor.checked_sub_months(Months::new(steps_back))?;
            Some(Window {
                label: start.format("%Y-%m").to_string(),
                start,
                end: start.checked_add_months(Months::new(1))?,
            })
        }
    }
}

/// Cumulative event count as of the end of each window.
///
/// Events before the first window count toward the baseline.
pub fn aggregate_events(events: &[CompletionEvent], windows: &[Window]) -> Vec<WindowPoint> {
    let days = sorted_days(events);
    windows
        .iter()
        .map(|window| WindowPoint {
            window_label: window.label.clone(),
            value: days.partition_point(|day| *day < window.end) as u64,
        })
        .collect()
}

/// Events that fall inside each window. Non-cumulative; used for heat-maps.
pub fn daily_contributions(events: &[CompletionEvent], windows: &[Window]) -> Vec<WindowPoint> {
    let days = sorted_days(events);
    windows
        .iter()
        .map(|window| {
            let before_end = days.partition_point(|day| *day < window.end);
            let before_start = days.partition_point(|day| *day < window.start);
            WindowPoint {
                window_label: window.label.clone(),
                value: (before_end - before_start) as u64,
            }
        })
        .collect()
}

/// Combined interpolated progress at the local start of each window's end.
pub fn aggregate_spans(
    spans: &[GoalSpan],
    windows: &[Window],
    tz: &FixedOffset,
) -> Vec<WindowPoint> {
    windows
        .iter()
        .map(|window| WindowPoint {
            window_label: window.label.clone(),
            value: interpolate_combined(spans, &local_midnight(window.end, tz)),
        })
        .collect()
}

fn sorted_days(events: &[CompletionEvent]) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = events.iter().map(|event| event.day).collect();
    days.sort_unstable();
    days
}
