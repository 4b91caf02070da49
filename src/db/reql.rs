//! ReQL term builder
//!
//! Only the catalog terms the provisioner needs. Terms serialize to the
//! nested-array JSON form `[type, [args...], {optargs}]` the server expects.

use serde_json::{Value, json};

/// Term type codes from the RethinkDB query protocol
mod term_type {
    pub const DB: u32 = 14;
    pub const DB_CREATE: u32 = 57;
    pub const DB_LIST: u32 = 59;
    pub const TABLE_CREATE: u32 = 60;
    pub const TABLE_LIST: u32 = 62;
    pub const CONTAINS: u32 = 93;
}

/// A catalog query or mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// `r.dbList()`
    DbList,
    /// `r.db(name)`
    Db(String),
    /// `<db>.tableList()`
    TableList(Box<Term>),
    /// `<seq>.contains(value)`
    Contains(Box<Term>, String),
    /// `r.dbCreate(name)`
    DbCreate(String),
    /// `<db>.tableCreate(name, {primary_key})`
    TableCreate {
        db: Box<Term>,
        name: String,
        primary_key: String,
    },
}

impl Term {
    pub fn db_list() -> Self {
        Term::DbList
    }

    pub fn db(name: impl Into<String>) -> Self {
        Term::Db(name.into())
    }

    pub fn db_create(name: impl Into<String>) -> Self {
        Term::DbCreate(name.into())
    }

    pub fn table_list(self) -> Self {
        Term::TableList(Box::new(self))
    }

    pub fn contains(self, value: impl Into<String>) -> Self {
        Term::Contains(Box::new(self), value.into())
    }

    pub fn table_create(self, name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Term::TableCreate {
            db: Box::new(self),
            name: name.into(),
            primary_key: primary_key.into(),
        }
    }

    /// Encode as ReQL JSON
    pub fn to_json(&self) -> Value {
        match self {
            Term::DbList => json!([term_type::DB_LIST, []]),
            Term::Db(name) => json!([term_type::DB, [name]]),
            Term::TableList(db) => json!([term_type::TABLE_LIST, [db.to_json()]]),
            Term::Contains(seq, value) => json!([term_type::CONTAINS, [seq.to_json(), value]]),
            Term::DbCreate(name) => json!([term_type::DB_CREATE, [name]]),
            Term::TableCreate {
                db,
                name,
                primary_key,
            } => json!([
                term_type::TABLE_CREATE,
                [db.to_json(), name],
                { "primary_key": primary_key }
            ]),
        }
    }
}
