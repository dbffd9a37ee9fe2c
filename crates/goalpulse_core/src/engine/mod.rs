//! Goal progress aggregation pipeline.
//!
//! # Responsibility
//! - Flatten goal hierarchies into typed completion events.
//! - Build cumulative, interpolated and windowed series from those events.
//!
//! # Invariants
//! - Every stage is a pure function of its inputs; no ambient clock or zone.
//! - Identical input yields identical output, ordered by input declaration
//!   order wherever timestamps tie.
//! - No stage returns an error; malformed records are counted and skipped.

pub mod cumulative;
pub mod interpolate;
pub mod normalizer;
pub mod window;
