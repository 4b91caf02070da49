//! Command execution handlers
//!
//! Executes parsed commands against a provisioner and renders the outcome
//! as user-facing text.

use crate::commands::Command;
use crate::db::Connector;
use crate::error::{DbtoolError, ProvisionError, Result};
use crate::provision::{DatabaseDescriptor, Outcome, Provisioner, Resource, TableDescriptor};
use std::time::Duration;

/// Command list shown for `help` and unrecognised input
pub const HELP_TEXT: &str = "\
Commands
--------
  ensure_database <name>                  Ensure that a RethinkDB database exists.
  ensure_table <db>.<table>[.<pk>]        Ensure that a table is in the given database.
                                          The primary key defaults to `id`.";

/// What a command run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// A resource was ensured
    Ensured {
        resource: Resource,
        outcome: Outcome,
    },
    /// Help was requested, or the command was not recognised
    Help,
}

impl Report {
    /// Whether the process should exit successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Report::Ensured { .. })
    }

    /// User-facing text for this report
    pub fn render(&self) -> String {
        match self {
            Report::Help => HELP_TEXT.to_string(),
            Report::Ensured { resource, outcome } => render_outcome(resource, *outcome),
        }
    }
}

/// Execute a command
///
/// Descriptors are validated before the provisioner opens a session. When
/// `timeout` is set the whole ensure call is bounded by it. On timeout the
/// ensure future is dropped, so its session is released by drop rather than
/// by `Session::close`.
pub async fn execute_command<C: Connector>(
    command: Command,
    provisioner: &Provisioner<C>,
    timeout: Option<Duration>,
) -> Result<Report> {
    let resource = match command {
        Command::Help => return Ok(Report::Help),
        Command::EnsureDatabase(name) => {
            let database = DatabaseDescriptor::new(name).map_err(ProvisionError::from)?;
            Resource::Database(database)
        }
        Command::EnsureTable(spec) => {
            let table = TableDescriptor::parse(&spec).map_err(ProvisionError::from)?;
            Resource::Table(table)
        }
    };

    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, provisioner.ensure(&resource))
            .await
            .map_err(|_| DbtoolError::Timeout(limit))??,
        None => provisioner.ensure(&resource).await?,
    };

    Ok(Report::Ensured { resource, outcome })
}

fn render_outcome(resource: &Resource, outcome: Outcome) -> String {
    match (resource, outcome) {
        (Resource::Database(db), Outcome::Satisfied) => {
            format!("Checking for database {} ... Exists", db)
        }
        (Resource::Database(db), Outcome::Created) => format!(
            "Checking for database {} ... Does not exist\nDatabase created: {}",
            db, db
        ),
        (Resource::Table(table), Outcome::Satisfied) => {
            format!("Checking for table {} ... Exists", table)
        }
        (Resource::Table(table), Outcome::Created) => format!(
            "Checking for table {} ... Does not exist\nTable created: {} (primary key: {})",
            table, table, table.primary_key
        ),
        (resource, Outcome::Reconciled) => format!(
            "Checking for {} ... Created concurrently by another client",
            resource
        ),
    }
}
