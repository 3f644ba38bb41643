//! Unit tests for s3kup-core.
//!
//! These tests exercise the push/list/pull lifecycle end to end against
//! in-memory storage, including partial failures.

pub mod lifecycle;
pub mod partial_failure;
