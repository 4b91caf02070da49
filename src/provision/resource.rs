//! Resource descriptors
//!
//! Built from caller input right before an ensure call. They carry no state
//! of their own; the cluster holds the real thing.

use crate::error::{ArgumentError, ArgumentResult};
use std::fmt;
use std::str::FromStr;

/// Primary key used when a table spec names none
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// A database in the cluster catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDescriptor {
    pub name: String,
}

impl DatabaseDescriptor {
    pub fn new(name: impl Into<String>) -> ArgumentResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ArgumentError::EmptyName);
        }
        Ok(Self { name })
    }
}

impl fmt::Display for DatabaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A table inside a database, with the primary key it is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub database: DatabaseDescriptor,
    pub name: String,
    pub primary_key: String,
}

impl TableDescriptor {
    pub fn new(
        database: impl Into<String>,
        name: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> ArgumentResult<Self> {
        let database = DatabaseDescriptor::new(database)?;
        let name = name.into();
        let primary_key = primary_key.into();
        if name.is_empty() || primary_key.is_empty() {
            return Err(ArgumentError::EmptyName);
        }
        Ok(Self {
            database,
            name,
            primary_key,
        })
    }

    /// Parse `<db>.<table>[.<primaryKey>]`
    ///
    /// The primary key defaults to [`DEFAULT_PRIMARY_KEY`].
    pub fn parse(spec: &str) -> ArgumentResult<Self> {
        let segments: Vec<&str> = spec.split('.').collect();
        match segments.as_slice() {
            [database, table] => Self::new(*database, *table, DEFAULT_PRIMARY_KEY),
            [database, table, primary_key] => Self::new(*database, *table, *primary_key),
            [_] => Err(ArgumentError::MalformedTableSpec(spec.to_string())),
            _ => Err(ArgumentError::TooManySegments(spec.to_string())),
        }
    }
}

impl FromStr for TableDescriptor {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.name)
    }
}

/// Anything an ensure call can provision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Database(DatabaseDescriptor),
    Table(TableDescriptor),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Database(db) => write!(f, "database {}", db),
            Resource::Table(table) => write!(f, "table {}", table),
        }
    }
}
