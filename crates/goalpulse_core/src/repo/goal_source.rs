//! Goal snapshot source contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the read-only seam to the storage collaborator.
//! - Provide an insertion-ordered in-memory source for tests and tooling.
//!
//! # Invariants
//! - Sources hand out owned snapshots; the engine never writes back.
//! - Owner listings preserve the source's declared order.

use crate::model::goal::{Goal, GoalId};
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Result type used by goal source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors from goal snapshot sources.
#[derive(Debug)]
pub enum SourceError {
    /// Snapshot file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Snapshot payload is not a JSON array of goals.
    Parse(String),
    /// Requested goal does not exist.
    NotFound(GoalId),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read goal snapshot `{}`: {source}", path.display())
            }
            Self::Parse(message) => write!(f, "invalid goal snapshot: {message}"),
            Self::NotFound(id) => write!(f, "goal not found: {id}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(_) => None,
            Self::NotFound(_) => None,
        }
    }
}

/// Read-only access to goal snapshots.
pub trait GoalSource {
    /// Loads one goal by id.
    fn goal(&self, goal_id: &str) -> SourceResult<Option<Goal>>;
    /// Lists every goal owned by `owner_id`, in source order.
    fn goals_for_owner(&self, owner_id: &str) -> SourceResult<Vec<Goal>>;
}

/// Goal source backed by an in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGoalSource {
    goals: Vec<Goal>,
}

impl InMemoryGoalSource {
    pub fn new(goals: Vec<Goal>) -> Self {
        Self { goals }
    }

    /// Parses a JSON array of goal records.
    ///
    /// Elements that are not objects, or that fail to decode, are skipped.
    /// Only a payload that is not an array at all is rejected.
    pub fn from_json_str(raw: &str) -> SourceResult<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| SourceError::Parse(err.to_string()))?;
        let Value::Array(items) = value else {
            return Err(SourceError::Parse(
                "top-level value is not an array".to_string(),
            ));
        };

        let total = items.len();
        let goals: Vec<Goal> = items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if goals.len() < total {
            warn!(
                "event=snapshot_load module=source status=partial skipped={}",
                total - goals.len()
            );
        }
        Ok(Self::new(goals))
    }

    /// Reads and parses a JSON snapshot file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let loaded = Self::from_json_str(&raw)?;
        info!(
            "event=snapshot_load module=source status=ok goals={}",
            loaded.goals.len()
        );
        Ok(loaded)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

impl GoalSource for InMemoryGoalSource {
    fn goal(&self, goal_id: &str) -> SourceResult<Option<Goal>> {
        Ok(self.goals.iter().find(|goal| goal.id == goal_id).cloned())
    }

    fn goals_for_owner(&self, owner_id: &str) -> SourceResult<Vec<Goal>> {
        Ok(self
            .goals
            .iter()
            .filter(|goal| goal.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
