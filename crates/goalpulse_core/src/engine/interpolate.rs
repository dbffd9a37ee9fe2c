//! Elapsed-time interpolator.
//!
//! Estimates how many subtopics a goal had completed at an arbitrary instant
//! by assuming uniform completion velocity between creation (C) and last
//! update (U). Used for month-level trends where per-subtopic history is not
//! required.
//!
//! # Invariants
//! - `T < C` contributes 0; `T >= U` (including `C == U`) contributes N.
//! - Between C and U the value is `round(N * (T - C) / (U - C))`, computed in
//!   integer arithmetic so the endpoints are exact, then clamped to `[0, N]`.
//! - Monotonic non-decreasing in T.

use crate::model::series::GoalSpan;
use chrono::{DateTime, FixedOffset};

/// Completed count credited to one goal at instant `at`.
pub fn interpolate_completed(span: &GoalSpan, at: &DateTime<FixedOffset>) -> u64 {
    let created = span.created_at.timestamp_millis();
    let updated = span.updated_at.timestamp_millis();
    let at = at.timestamp_millis();

    if at < created {
        return 0;
    }
    if updated <= at {
        return span.completed;
    }

    let elapsed = i128::from(at - created);
    let duration = i128::from(updated - created);
    let total = i128::from(span.completed);
    // Half-up rounding of total * elapsed / duration.
    let rounded = (2 * total * elapsed + duration) / (2 * duration);
    u64::try_from(rounded.clamp(0, total)).unwrap_or(span.completed)
}

/// Sum of independently interpolated contributions at instant `at`.
pub fn interpolate_combined(spans: &[GoalSpan], at: &DateTime<FixedOffset>) -> u64 {
    spans
        .iter()
        .map(|span| interpolate_completed(span, at))
        .sum()
}
