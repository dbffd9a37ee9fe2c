//! Hierarchy normalizer.
//!
//! # Responsibility
//! - Walk goal → category → topic → subtopic once and emit completion events.
//! - Count subtopics by traversal to cross-check the stored counters.
//!
//! # Invariants
//! - Events keep hierarchy declaration order; sorting belongs to the builders.
//! - A completion timestamp that fails to parse excludes that event and is
//!   counted in `skipped_records`; the traversal always continues.
//! - Never panics on partial input.

use crate::dates::{calendar_day, parse_instant};
use crate::model::goal::{Goal, GoalId};
use crate::model::series::{CompletionEvent, GoalSpan};
use chrono::FixedOffset;
use log::{debug, warn};

/// Flat, typed view of one goal snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGoal {
    pub goal_id: GoalId,
    /// Completion events in hierarchy order.
    pub events: Vec<CompletionEvent>,
    pub total_subtopics: u64,
    /// Completed subtopics counted by traversal, dated or not.
    pub completed_subtopics: u64,
    /// Denormalized counter as stored on the goal, if present.
    pub recorded_completed: Option<u64>,
    /// Completed subtopics with no completion timestamp at all.
    pub undated_completions: u64,
    /// Completed subtopics whose timestamp failed to parse.
    pub skipped_records: usize,
}

impl NormalizedGoal {
    /// Whether the stored completed counter agrees with traversal.
    ///
    /// Goals without a stored counter are considered consistent.
    pub fn counter_consistent(&self) -> bool {
        self.recorded_completed
            .map_or(true, |recorded| recorded == self.completed_subtopics)
    }
}

/// Normalizes one goal snapshot into completion events and counters.
pub fn normalize_goal(goal: &Goal, tz: &FixedOffset) -> NormalizedGoal {
    let mut events = Vec::new();
    let mut total_subtopics = 0_u64;
    let mut completed_subtopics = 0_u64;
    let mut undated_completions = 0_u64;
    let mut skipped_records = 0_usize;

    for (topic, subtopic) in goal.subtopics() {
        total_subtopics += 1;
        if !subtopic.status.is_completed() {
            continue;
        }
        completed_subtopics += 1;

        let Some(raw) = subtopic.completed_at.as_deref() else {
            undated_completions += 1;
            continue;
        };
        let Some(timestamp) = parse_instant(raw, tz) else {
            skipped_records += 1;
            continue;
        };

        events.push(CompletionEvent {
            subtopic_id: subtopic.id.clone(),
            topic_id: topic.id.clone(),
            topic_name: topic.name.clone(),
            timestamp,
            day: calendar_day(raw).unwrap_or_else(|| timestamp.date_naive()),
        });
    }

    let normalized = NormalizedGoal {
        goal_id: goal.id.clone(),
        events,
        total_subtopics,
        completed_subtopics,
        recorded_completed: goal.completed_topics,
        undated_completions,
        skipped_records,
    };

    if normalized.skipped_records > 0 || !normalized.counter_consistent() {
        warn!(
            "event=normalize_goal module=engine status=warn goal_id={} skipped={} recorded_completed={:?} traversed_completed={}",
            normalized.goal_id,
            normalized.skipped_records,
            normalized.recorded_completed,
            normalized.completed_subtopics
        );
    } else {
        debug!(
            "event=normalize_goal module=engine status=ok goal_id={} events={} total={}",
            normalized.goal_id,
            normalized.events.len(),
            normalized.total_subtopics
        );
    }

    normalized
}

/// Builds the (C, U, N) triple for elapsed-time interpolation.
///
/// Returns `None` when either goal timestamp is missing or unparseable.
pub fn goal_span(goal: &Goal, completed: u64, tz: &FixedOffset) -> Option<GoalSpan> {
    let created_at = goal
        .created_at
        .as_deref()
        .and_then(|raw| parse_instant(raw, tz))?;
    let updated_at = goal
        .updated_at
        .as_deref()
        .and_then(|raw| parse_instant(raw, tz))?;
    Some(GoalSpan {
        created_at,
        updated_at,
        completed,
    })
}

#[cfg(test)]
mod tests {
    use super::{goal_span, normalize_goal};
    use crate::model::goal::{Category, Goal, Subtopic, SubtopicStatus, Topic};
    use chrono::FixedOffset;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn empty_goal_normalizes_to_nothing() {
        let normalized = normalize_goal(&Goal::default(), &utc());
        assert!(normalized.events.is_empty());
        assert_eq!(normalized.total_subtopics, 0);
        assert!(normalized.counter_consistent());
    }

    #[test]
    fn counts_undated_and_unparseable_separately() {
        let mut goal = Goal::new("g1", "Rust", "2024-01-01", "2024-01-31");
        goal.categories.push(Category {
            id: "c1".into(),
            name: "Core".into(),
            topics: vec![Topic {
                id: "t1".into(),
                name: "Ownership".into(),
                subtopics: vec![
                    Subtopic::completed("s1", "Moves", "2024-01-05T09:00:00Z"),
                    Subtopic::new("s2", "Borrows", SubtopicStatus::Completed),
                    Subtopic::completed("s3", "Lifetimes", "last tuesday"),
                    Subtopic::new("s4", "Pinning", SubtopicStatus::Started),
                ],
            }],
        });

        let normalized = normalize_goal(&goal, &utc());
        assert_eq!(normalized.events.len(), 1);
        assert_eq!(normalized.total_subtopics, 4);
        assert_eq!(normalized.completed_subtopics, 3);
        assert_eq!(normalized.undated_completions, 1);
        assert_eq!(normalized.skipped_records, 1);
    }

    #[test]
    fn goal_span_requires_both_timestamps() {
        let mut goal = Goal::new("g1", "Rust", "2024-01-01", "2024-01-31");
        assert!(goal_span(&goal, 3, &utc()).is_some());

        goal.updated_at = Some("not a date".into());
        assert!(goal_span(&goal, 3, &utc()).is_none());
    }
}
