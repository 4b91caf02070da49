//! Cluster abstraction layer
//!
//! This module provides a trait-based abstraction over cluster sessions,
//! allowing the ensure logic to run against the RethinkDB wire driver or
//! an in-memory cluster in tests.

pub mod provider;
pub mod reql;
pub mod rethink;

// Re-export main types
pub use provider::{Connector, Session};
pub use reql::Term;
pub use rethink::{RethinkConnector, RethinkSession};
