//! Goal hierarchy snapshot model.
//!
//! # Responsibility
//! - Mirror the goal → category → topic → subtopic records as received.
//! - Absorb malformed nested collections during deserialization.
//!
//! # Invariants
//! - Timestamps stay raw strings; parsing happens in the normalizer so that
//!   failures can be counted instead of rejected.
//! - Deserializing a goal never fails because of nested collection shape.
//! - `completed_at` is meaningful only when `status == Completed`.

use super::lenient;
use serde::{Deserialize, Deserializer, Serialize};

/// Storage identifier, kept opaque.
pub type GoalId = String;

/// Subtopic lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtopicStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Work is in progress.
    Started,
    /// Finished; the only status that produces completion events.
    Completed,
    /// Unrecognised wire value. Never treated as completed.
    Unknown,
}

impl SubtopicStatus {
    /// Maps a wire value to a status, case-insensitively.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "started" => Self::Started,
            "completed" => Self::Completed,
            _ => Self::Unknown,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

impl<'de> Deserialize<'de> for SubtopicStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(raw)) => Self::from_wire(&raw),
            None | Some(serde_json::Value::Null) => Self::Pending,
            Some(_) => Self::Unknown,
        })
    }
}

/// Top-level tracked objective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default, alias = "_id", deserialize_with = "lenient::identifier")]
    pub id: GoalId,
    /// Owning user reference. Opaque to the engine.
    #[serde(default, alias = "userId", deserialize_with = "lenient::identifier")]
    pub owner_id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// ISO-8601 instant or date-only string.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<String>,
    /// ISO-8601 instant or date-only string. Expected `>= created_at`.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<String>,
    /// Denormalized subtopic total maintained by storage.
    #[serde(default, deserialize_with = "lenient::counter")]
    pub total_topics: Option<u64>,
    /// Denormalized completed-subtopic counter maintained by storage.
    #[serde(default, deserialize_with = "lenient::counter")]
    pub completed_topics: Option<u64>,
    #[serde(default, deserialize_with = "lenient::collection")]
    pub categories: Vec<Category>,
}

/// Grouping of topics inside one goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, alias = "_id", deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::collection")]
    pub topics: Vec<Topic>,
}

/// Named unit of study; the key for per-topic series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(default, alias = "_id", deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::collection")]
    pub subtopics: Vec<Subtopic>,
}

/// Smallest trackable unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtopic {
    #[serde(default, alias = "_id", deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default)]
    pub status: SubtopicStatus,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<String>,
    /// Present iff `status == Completed` for well-formed records.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub completed_at: Option<String>,
}

impl Goal {
    /// Creates an empty goal shell with the given identity and span.
    pub fn new(
        id: impl Into<GoalId>,
        name: impl Into<String>,
        created_at: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: Some(created_at.into()),
            updated_at: Some(updated_at.into()),
            ..Self::default()
        }
    }

    /// Iterates every subtopic in declared hierarchy order.
    pub fn subtopics(&self) -> impl Iterator<Item = (&Topic, &Subtopic)> {
        self.categories
            .iter()
            .flat_map(|category| category.topics.iter())
            .flat_map(|topic| topic.subtopics.iter().map(move |sub| (topic, sub)))
    }
}

impl Subtopic {
    /// Creates a subtopic in the given status without timestamps.
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: SubtopicStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            ..Self::default()
        }
    }

    /// Creates a completed subtopic with its completion timestamp.
    pub fn completed(
        id: impl Into<String>,
        name: impl Into<String>,
        completed_at: impl Into<String>,
    ) -> Self {
        Self {
            completed_at: Some(completed_at.into()),
            ..Self::new(id, name, SubtopicStatus::Completed)
        }
    }
}
