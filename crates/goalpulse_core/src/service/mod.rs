//! Use-case services over the aggregation engine.
//!
//! # Responsibility
//! - Orchestrate snapshot loading and pipeline stages per chart view.
//! - Keep presentation callers decoupled from engine internals.

pub mod progress_service;
