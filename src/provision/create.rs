//! Creation requests
//!
//! These never look at the catalog first. A failure here may just mean
//! someone else created the resource in the meantime; telling those apart
//! is the provisioner's job.

use crate::db::{Session, Term};
use crate::error::{DriverError, ProvisionError, ProvisionResult};
use crate::provision::resource::{DatabaseDescriptor, TableDescriptor};
use serde_json::Value;
use tracing::info;

/// Issue `r.dbCreate(name)`
pub async fn create_database<S: Session>(
    session: &mut S,
    name: &str,
) -> ProvisionResult<DatabaseDescriptor> {
    let resource = format!("database {}", name);
    session
        .run(&Term::db_create(name))
        .await
        .and_then(|reply| check_created(&reply, "dbs_created"))
        .map_err(|source| ProvisionError::Creation { resource, source })?;

    info!(database = name, "created database");
    Ok(DatabaseDescriptor {
        name: name.to_string(),
    })
}

/// Issue `r.db(database).tableCreate(name, {primary_key})`
pub async fn create_table<S: Session>(
    session: &mut S,
    database: &str,
    name: &str,
    primary_key: &str,
) -> ProvisionResult<TableDescriptor> {
    let resource = format!("table {}.{}", database, name);
    session
        .run(&Term::db(database).table_create(name, primary_key))
        .await
        .and_then(|reply| check_created(&reply, "tables_created"))
        .map_err(|source| ProvisionError::Creation { resource, source })?;

    info!(database, table = name, primary_key, "created table");
    Ok(TableDescriptor {
        database: DatabaseDescriptor {
            name: database.to_string(),
        },
        name: name.to_string(),
        primary_key: primary_key.to_string(),
    })
}

/// Reject write summaries that report nothing created
fn check_created(reply: &Value, counter: &str) -> Result<(), DriverError> {
    match reply.get(counter).and_then(Value::as_u64) {
        Some(0) => Err(DriverError::Protocol(format!(
            "server reported {} = 0",
            counter
        ))),
        _ => Ok(()),
    }
}
