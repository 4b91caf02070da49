//! Common test utilities and helpers
//!
//! Shared test infrastructure for integration tests: an in-memory cluster
//! that interprets the catalog terms the provisioner sends.

#![allow(dead_code)]

use dbtool::DriverError;
use dbtool::config::ClusterEndpoint;
use dbtool::db::{Connector, Session, Term};
use dbtool::error::{DriverResult, ServerErrorKind};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Barrier;

/// RethinkDB `ErrorType::OP_FAILED`
const OP_FAILED: u32 = 4_100_000;
/// RethinkDB `ErrorType::NON_EXISTENCE`
const NON_EXISTENCE: u32 = 3_100_000;

/// How creation requests behave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateMode {
    /// Create as a real server would
    #[default]
    Normal,
    /// Reject every creation and leave the catalog unchanged
    Fail,
    /// Another client creates the resource just before us, so we get
    /// "already exists"
    LoseRace,
    /// Reject the creation, then fail every later catalog query
    FailAndLoseCatalog,
}

#[derive(Debug, Default)]
struct ClusterState {
    /// database -> (table -> primary key)
    databases: BTreeMap<String, BTreeMap<String, String>>,
    connects: usize,
    closes: usize,
    queries: Vec<Term>,
    refuse_connections: bool,
    create_mode: CreateMode,
    catalog_lost: bool,
}

/// Shared in-memory cluster; clones see the same catalog
#[derive(Debug, Clone, Default)]
pub struct MemoryCluster {
    state: Arc<Mutex<ClusterState>>,
    /// Sessions wait here after their first existence check
    check_barrier: Option<Arc<Barrier>>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(self, name: &str) -> Self {
        self.state().databases.entry(name.to_string()).or_default();
        self
    }

    pub fn with_table(self, database: &str, table: &str, primary_key: &str) -> Self {
        self.state()
            .databases
            .entry(database.to_string())
            .or_default()
            .insert(table.to_string(), primary_key.to_string());
        self
    }

    pub fn refusing_connections(self) -> Self {
        self.state().refuse_connections = true;
        self
    }

    pub fn with_create_mode(self, mode: CreateMode) -> Self {
        self.state().create_mode = mode;
        self
    }

    /// Hold every session after its first check until `sessions` have checked
    pub fn with_check_barrier(mut self, sessions: usize) -> Self {
        self.check_barrier = Some(Arc::new(Barrier::new(sessions)));
        self
    }

    pub fn database_names(&self) -> Vec<String> {
        self.state().databases.keys().cloned().collect()
    }

    pub fn has_database(&self, name: &str) -> bool {
        self.state().databases.contains_key(name)
    }

    pub fn primary_key(&self, database: &str, table: &str) -> Option<String> {
        self.state()
            .databases
            .get(database)
            .and_then(|tables| tables.get(table))
            .cloned()
    }

    pub fn connects(&self) -> usize {
        self.state().connects
    }

    pub fn closes(&self) -> usize {
        self.state().closes
    }

    pub fn queries(&self) -> Vec<Term> {
        self.state().queries.clone()
    }

    pub fn creation_count(&self) -> usize {
        self.state()
            .queries
            .iter()
            .filter(|t| matches!(t, Term::DbCreate(_) | Term::TableCreate { .. }))
            .count()
    }

    fn state(&self) -> MutexGuard<'_, ClusterState> {
        self.state.lock().unwrap()
    }

    fn apply(&self, term: &Term) -> DriverResult<Value> {
        let mut state = self.state();
        state.queries.push(term.clone());

        match term {
            Term::Contains(seq, value) => {
                if state.catalog_lost {
                    return Err(runtime_error(OP_FAILED, "Cannot read catalog."));
                }
                let names = list(&state, seq)?;
                Ok(Value::Bool(names.iter().any(|n| n == value)))
            }
            Term::DbCreate(name) => {
                check_create_mode(&mut state)?;
                if state.create_mode == CreateMode::LoseRace {
                    state.databases.entry(name.clone()).or_default();
                }
                if state.databases.contains_key(name) {
                    return Err(runtime_error(
                        OP_FAILED,
                        &format!("Database `{}` already exists.", name),
                    ));
                }
                state.databases.insert(name.clone(), BTreeMap::new());
                Ok(json!({ "dbs_created": 1, "config_changes": [] }))
            }
            Term::TableCreate {
                db,
                name,
                primary_key,
            } => {
                let database = db_name(db)?;
                check_create_mode(&mut state)?;
                let mode = state.create_mode;
                let tables = state.databases.get_mut(&database).ok_or_else(|| {
                    runtime_error(
                        NON_EXISTENCE,
                        &format!("Database `{}` does not exist.", database),
                    )
                })?;
                if mode == CreateMode::LoseRace {
                    tables
                        .entry(name.clone())
                        .or_insert_with(|| primary_key.clone());
                }
                if tables.contains_key(name) {
                    return Err(runtime_error(
                        OP_FAILED,
                        &format!("Table `{}.{}` already exists.", database, name),
                    ));
                }
                tables.insert(name.clone(), primary_key.clone());
                Ok(json!({ "tables_created": 1, "config_changes": [] }))
            }
            other => Err(DriverError::Protocol(format!(
                "memory cluster cannot run {:?}",
                other
            ))),
        }
    }
}

fn check_create_mode(state: &mut ClusterState) -> DriverResult<()> {
    match state.create_mode {
        CreateMode::Normal | CreateMode::LoseRace => Ok(()),
        CreateMode::Fail => Err(runtime_error(OP_FAILED, "Cluster is read-only.")),
        CreateMode::FailAndLoseCatalog => {
            state.catalog_lost = true;
            Err(runtime_error(OP_FAILED, "Cluster is read-only."))
        }
    }
}

fn list(state: &ClusterState, seq: &Term) -> DriverResult<Vec<String>> {
    match seq {
        Term::DbList => Ok(state.databases.keys().cloned().collect()),
        Term::TableList(db) => {
            let database = db_name(db)?;
            state
                .databases
                .get(&database)
                .map(|tables| tables.keys().cloned().collect())
                .ok_or_else(|| {
                    runtime_error(
                        NON_EXISTENCE,
                        &format!("Database `{}` does not exist.", database),
                    )
                })
        }
        other => Err(DriverError::Protocol(format!("not a sequence: {:?}", other))),
    }
}

fn db_name(term: &Term) -> DriverResult<String> {
    match term {
        Term::Db(name) => Ok(name.clone()),
        other => Err(DriverError::Protocol(format!("not a database: {:?}", other))),
    }
}

fn runtime_error(error_type: u32, message: &str) -> DriverError {
    DriverError::Server {
        kind: ServerErrorKind::Runtime,
        error_type: Some(error_type),
        message: message.to_string(),
    }
}

impl Connector for MemoryCluster {
    type Session = MemorySession;

    async fn connect(&self, _endpoint: &ClusterEndpoint) -> DriverResult<MemorySession> {
        let mut state = self.state();
        if state.refuse_connections {
            return Err(DriverError::Io(io::Error::from(
                io::ErrorKind::ConnectionRefused,
            )));
        }
        state.connects += 1;
        Ok(MemorySession {
            cluster: self.clone(),
            checks: 0,
        })
    }
}

/// Session handed out by [`MemoryCluster`]
pub struct MemorySession {
    cluster: MemoryCluster,
    checks: usize,
}

impl Session for MemorySession {
    async fn run(&mut self, term: &Term) -> DriverResult<Value> {
        let result = self.cluster.apply(term);

        if matches!(term, Term::Contains(..)) {
            self.checks += 1;
            if self.checks == 1 {
                if let Some(barrier) = &self.cluster.check_barrier {
                    barrier.wait().await;
                }
            }
        }
        result
    }

    async fn close(self) -> DriverResult<()> {
        self.cluster.state().closes += 1;
        Ok(())
    }
}

/// Endpoint used by tests that never touch the network
pub fn test_endpoint() -> ClusterEndpoint {
    ClusterEndpoint::new("memory", 28015)
}
