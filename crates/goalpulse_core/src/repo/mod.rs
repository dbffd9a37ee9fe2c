//! Storage collaborator seam.
//!
//! # Responsibility
//! - Define how the engine obtains read-only goal snapshots.
//! - Keep storage details out of aggregation code.

pub mod goal_source;
