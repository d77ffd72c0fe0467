//! Testing infrastructure for p4bridge integration tests.
//!
//! This crate provides utilities for exercising the callback protocol
//! without a real server:
//! - `ScriptedEngine`: a `CommandEngine` that plays back scripted events
//! - `fixtures`: wire-record and diagnostic builders

pub mod engine;
pub mod fixtures;

pub use engine::{EngineLog, ScriptEvent, ScriptedEngine};
pub use fixtures::{diag, error_diag, info_diag, merge_request, warning_diag, wire};
