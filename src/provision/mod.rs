//! Idempotent provisioning
//!
//! `ensure` checks the live catalog and creates the resource only if it is
//! missing:
//!
//! ```text
//! CHECKING ──exists──▶ SATISFIED ──▶ DONE
//!     │
//!   absent
//!     ▼
//! CREATING ──ok──▶ DONE
//!     │
//!   error ──▶ re-check ──exists──▶ DONE (reconciled)
//!                 │
//!                 └──absent/error──▶ FAILED
//! ```
//!
//! A session is opened per call and closed before the call returns, on
//! every path.

pub mod check;
pub mod create;
pub mod resource;

pub use resource::{DEFAULT_PRIMARY_KEY, DatabaseDescriptor, Resource, TableDescriptor};

use crate::config::ClusterEndpoint;
use crate::db::{Connector, Session};
use crate::error::{ProvisionError, ProvisionResult};
use tracing::{debug, warn};

/// How an ensure call reached its terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Resource was already present; nothing was mutated
    Satisfied,
    /// This call created the resource
    Created,
    /// Creation failed but the resource exists, so another client won the race
    Reconciled,
}

/// Runs ensure calls against one cluster endpoint
pub struct Provisioner<C> {
    connector: C,
    endpoint: ClusterEndpoint,
}

impl<C: Connector> Provisioner<C> {
    pub fn new(connector: C, endpoint: ClusterEndpoint) -> Self {
        Self {
            connector,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &ClusterEndpoint {
        &self.endpoint
    }

    /// Make sure database `name` exists
    pub async fn ensure_database(&self, name: &str) -> ProvisionResult<Outcome> {
        let database = DatabaseDescriptor::new(name)?;
        self.ensure(&Resource::Database(database)).await
    }

    /// Make sure the table described by `<db>.<table>[.<primaryKey>]` exists
    ///
    /// The table spec is validated before any connection is made.
    pub async fn ensure_table(&self, spec: &str) -> ProvisionResult<Outcome> {
        let table = TableDescriptor::parse(spec)?;
        self.ensure(&Resource::Table(table)).await
    }

    /// Open a session, run the ensure state machine, close the session
    pub async fn ensure(&self, resource: &Resource) -> ProvisionResult<Outcome> {
        let mut session = self.connect().await?;

        let result = ensure_in(&mut session, resource).await;

        if let Err(e) = session.close().await {
            warn!(address = %self.endpoint, error = %e, "failed to close session");
        }
        result
    }

    async fn connect(&self) -> ProvisionResult<C::Session> {
        debug!(address = %self.endpoint, "connecting");
        self.connector
            .connect(&self.endpoint)
            .await
            .map_err(|source| ProvisionError::Connection {
                address: self.endpoint.address(),
                source,
            })
    }
}

/// Run the check-then-create protocol on an open session
pub async fn ensure_in<S: Session>(
    session: &mut S,
    resource: &Resource,
) -> ProvisionResult<Outcome> {
    if resource_exists(session, resource).await? {
        debug!(%resource, "already present");
        return Ok(Outcome::Satisfied);
    }

    debug!(%resource, "absent, creating");
    let err = match create_resource(session, resource).await {
        Ok(()) => return Ok(Outcome::Created),
        Err(err) => err,
    };

    // Another client may have created it between our check and create.
    match resource_exists(session, resource).await {
        Ok(true) => {
            warn!(%resource, error = %err, "creation failed but resource now exists");
            Ok(Outcome::Reconciled)
        }
        Ok(false) => Err(err),
        Err(recheck) => {
            warn!(%resource, error = %recheck, "re-check after failed creation failed");
            Err(err)
        }
    }
}

async fn resource_exists<S: Session>(
    session: &mut S,
    resource: &Resource,
) -> ProvisionResult<bool> {
    match resource {
        Resource::Database(db) => check::database_exists(session, &db.name).await,
        Resource::Table(table) => {
            let database = &table.database.name;
            check::table_exists(session, database, &table.name).await
        }
    }
}

async fn create_resource<S: Session>(
    session: &mut S,
    resource: &Resource,
) -> ProvisionResult<()> {
    match resource {
        Resource::Database(db) => create::create_database(session, &db.name)
            .await
            .map(|_| ()),
        Resource::Table(table) => create::create_table(
            session,
            &table.database.name,
            &table.name,
            &table.primary_key,
        )
        .await
        .map(|_| ()),
    }
}
