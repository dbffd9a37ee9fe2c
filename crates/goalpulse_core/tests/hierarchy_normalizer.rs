use chrono::{FixedOffset, NaiveDate};
use goalpulse_core::{normalize_goal, Goal};
use serde_json::json;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn goal(value: serde_json::Value) -> Goal {
    serde_json::from_value(value).unwrap()
}

#[test]
fn emits_events_in_hierarchy_order() {
    let goal = goal(json!({
        "id": "g1",
        "name": "DSA",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-02-10T00:00:00Z",
        "completedTopics": 3,
        "categories": [
            { "id": "c1", "name": "Linear", "topics": [
                { "id": "t1", "name": "Arrays", "subtopics": [
                    { "id": "s1", "status": "completed", "completedAt": "2024-02-03T08:00:00Z" },
                    { "id": "s2", "status": "completed", "completedAt": "2024-02-01T08:00:00Z" },
                    { "id": "s3", "status": "pending" }
                ]}
            ]},
            { "id": "c2", "name": "Graphs", "topics": [
                { "id": "t2", "name": "BFS", "subtopics": [
                    { "id": "s4", "status": "completed", "completedAt": "2024-01-20" }
                ]}
            ]}
        ]
    }));

    let normalized = normalize_goal(&goal, &utc());
    let ids: Vec<&str> = normalized
        .events
        .iter()
        .map(|event| event.subtopic_id.as_str())
        .collect();
    assert_eq!(ids, vec!["s1", "s2", "s4"]);
    assert_eq!(normalized.events[2].topic_id, "t2");
    assert_eq!(normalized.events[2].topic_name, "BFS");
    assert_eq!(normalized.total_subtopics, 4);
    assert_eq!(normalized.completed_subtopics, 3);
    assert!(normalized.counter_consistent());
    assert_eq!(normalized.skipped_records, 0);
}

#[test]
fn malformed_nesting_is_treated_as_empty() {
    let goal = goal(json!({
        "id": "g1",
        "categories": [
            null,
            { "id": "c1", "topics": null },
            { "id": "c2", "topics": [ { "id": "t1", "name": "Heaps", "subtopics": 7 } ] },
            { "id": "c3", "topics": [ { "id": "t2", "name": "Tries", "subtopics": [
                { "id": "s1", "status": "completed", "completedAt": "2024-05-05" }
            ]}]}
        ]
    }));

    let normalized = normalize_goal(&goal, &utc());
    assert_eq!(normalized.events.len(), 1);
    assert_eq!(normalized.total_subtopics, 1);
}

#[test]
fn unparseable_timestamps_are_counted_not_fatal() {
    let goal = goal(json!({
        "id": "g1",
        "categories": [ { "id": "c1", "topics": [ { "id": "t1", "name": "Sorting", "subtopics": [
            { "id": "s1", "status": "completed", "completedAt": "2024-02-30" },
            { "id": "s2", "status": "completed", "completedAt": "soon" },
            { "id": "s3", "status": "completed", "completedAt": "2024-02-01T10:00:00Z" }
        ]}]}]
    }));

    let normalized = normalize_goal(&goal, &utc());
    assert_eq!(normalized.skipped_records, 2);
    assert_eq!(normalized.events.len(), 1);
    assert_eq!(normalized.completed_subtopics, 3);
}

#[test]
fn stale_counter_is_detected() {
    let goal = goal(json!({
        "id": "g1",
        "completedTopics": 5,
        "categories": [ { "id": "c1", "topics": [ { "id": "t1", "name": "Stacks", "subtopics": [
            { "id": "s1", "status": "completed", "completedAt": "2024-02-01" }
        ]}]}]
    }));

    let normalized = normalize_goal(&goal, &utc());
    assert_eq!(normalized.recorded_completed, Some(5));
    assert_eq!(normalized.completed_subtopics, 1);
    assert!(!normalized.counter_consistent());
}

#[test]
fn event_day_uses_stored_date_not_shifted_instant() {
    let goal = goal(json!({
        "id": "g1",
        "categories": [ { "id": "c1", "topics": [ { "id": "t1", "name": "Queues", "subtopics": [
            { "id": "s1", "status": "completed", "completedAt": "2024-01-31T23:30:00-08:00" }
        ]}]}]
    }));

    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let normalized = normalize_goal(&goal, &tz);
    assert_eq!(
        normalized.events[0].day,
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    );
}

#[test]
fn status_other_than_completed_never_emits() {
    let goal = goal(json!({
        "id": "g1",
        "categories": [ { "id": "c1", "topics": [ { "id": "t1", "name": "Hashing", "subtopics": [
            { "id": "s1", "status": "started", "completedAt": "2024-02-01" },
            { "id": "s2", "status": 3, "completedAt": "2024-02-01" },
            { "id": "s3", "completedAt": "2024-02-01" }
        ]}]}]
    }));

    let normalized = normalize_goal(&goal, &utc());
    assert!(normalized.events.is_empty());
    assert_eq!(normalized.total_subtopics, 3);
    assert_eq!(normalized.completed_subtopics, 0);
}
