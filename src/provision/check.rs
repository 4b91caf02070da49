//! Existence checks against the live catalog

use crate::db::{Session, Term};
use crate::error::{DriverError, ProvisionError, ProvisionResult};
use tracing::debug;

/// Whether `name` is in the cluster's database list
pub async fn database_exists<S: Session>(session: &mut S, name: &str) -> ProvisionResult<bool> {
    let term = Term::db_list().contains(name);
    let resource = || format!("database {}", name);
    let found = run_membership(session, &term, resource).await?;
    debug!(database = name, exists = found, "checked database");
    Ok(found)
}

/// Whether `name` is in the table list of `database`
///
/// Fails with `ProvisionError::Query` if the database itself is missing.
pub async fn table_exists<S: Session>(
    session: &mut S,
    database: &str,
    name: &str,
) -> ProvisionResult<bool> {
    let term = Term::db(database).table_list().contains(name);
    let resource = || format!("table {}.{}", database, name);
    let found = run_membership(session, &term, resource).await?;
    debug!(database, table = name, exists = found, "checked table");
    Ok(found)
}

async fn run_membership<S, F>(session: &mut S, term: &Term, resource: F) -> ProvisionResult<bool>
where
    S: Session,
    F: Fn() -> String,
{
    let value = session
        .run(term)
        .await
        .map_err(|source| ProvisionError::Query {
            resource: resource(),
            source,
        })?;

    value.as_bool().ok_or_else(|| ProvisionError::Query {
        resource: resource(),
        source: DriverError::Protocol(format!("expected a boolean, got {}", value)),
    })
}
