//! Test doubles for code built on [`crate::connector::DatabaseConnector`].
//!
//! Available to this crate's own tests and, through the `test-utils` feature, to downstream
//! crates.

mod scripted;

pub use scripted::{ExecutedCommand, ExecutionKind, ScriptedConnector};
