//! Cluster provider traits
//!
//! Defines the interface that cluster backends must implement.
//! This abstraction allows for:
//! - Swapping the wire driver without touching the ensure logic
//! - Easy testing with in-memory cluster implementations
//! - Consistent error handling

use crate::config::ClusterEndpoint;
use crate::db::reql::Term;
use crate::error::DriverResult;
use serde_json::Value;

/// Opens sessions against a cluster
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Session: Session;

    /// Establish a session with the node at `endpoint`
    ///
    /// # Errors
    /// Returns a `DriverError` if the node cannot be reached or refuses the
    /// handshake. No usable session exists in that case.
    async fn connect(&self, endpoint: &ClusterEndpoint) -> DriverResult<Self::Session>;
}

/// An open session, exclusively owned by whoever connected it
#[allow(async_fn_in_trait)]
pub trait Session {
    /// Run a single term and return its result datum
    ///
    /// Sequences come back as a JSON array.
    ///
    /// # Errors
    /// Returns `DriverError::Server` when the cluster rejects the query and
    /// other `DriverError` variants for transport failures.
    async fn run(&mut self, term: &Term) -> DriverResult<Value>;

    /// Release the session
    async fn close(self) -> DriverResult<()>
    where
        Self: Sized;
}
