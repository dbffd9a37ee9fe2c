//! Goal hierarchy snapshot and derived series shapes.
//!
//! # Responsibility
//! - Define the read-only goal tree received from the storage collaborator.
//! - Define the ephemeral output records handed to the presentation layer.
//!
//! # Invariants
//! - Snapshot types never hold back-references to derived series.
//! - Derived records are recomputed per request and never persisted.

pub mod goal;
mod lenient;
pub mod series;
