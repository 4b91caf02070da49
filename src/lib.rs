//! dbtool - Idempotent database and table provisioning for RethinkDB
//!
//! dbtool makes sure a database, or a table with a chosen primary key,
//! exists on a cluster. Running it again against the same cluster is a
//! no-op, and two clients racing to create the same resource both succeed.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`]: Cluster endpoint and user settings
//! - [`db`]: Session traits and the RethinkDB wire driver
//! - [`provision`]: Descriptors, existence checks, creation and the ensure state machine
//! - [`commands`]: Command parsing and execution for the CLI
//! - [`error`]: Error types and result aliases
//!
//! # Example
//!
//! ```no_run
//! use dbtool::config::ClusterEndpoint;
//! use dbtool::db::RethinkConnector;
//! use dbtool::provision::{Outcome, Provisioner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provisioner = Provisioner::new(RethinkConnector, ClusterEndpoint::new("localhost", 28015));
//!
//! provisioner.ensure_database("app").await?;
//! let outcome = provisioner.ensure_table("app.events.event_id").await?;
//! if outcome == Outcome::Satisfied {
//!     println!("table was already there");
//! }
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod provision;

pub use error::{ArgumentError, ConfigError, DbtoolError, DriverError, ProvisionError, Result};
