//! Error types for dbtool
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors with clear error chains.

use std::io;
use std::time::Duration;

/// Main error type for the dbtool application
#[derive(Debug, thiserror::Error)]
pub enum DbtoolError {
    /// Provisioning errors
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The whole ensure call exceeded the caller-imposed deadline
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced by an ensure call
///
/// Every variant past `Argument` names the address or resource it was
/// working on and keeps the wire-level cause as its source.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// Malformed resource descriptor, raised before any network traffic
    #[error("Invalid argument: {0}")]
    Argument(#[from] ArgumentError),

    /// Could not open a session
    #[error("Could not connect to {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: DriverError,
    },

    /// Catalog lookup failed
    #[error("Could not query catalog for {resource}: {source}")]
    Query {
        resource: String,
        #[source]
        source: DriverError,
    },

    /// Creation request failed and the resource is still absent
    #[error("Could not create {resource}: {source}")]
    Creation {
        resource: String,
        #[source]
        source: DriverError,
    },
}

/// Malformed command arguments or resource descriptors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// Command needs a trailing argument that was not given
    #[error("Missing required argument for {0}")]
    MissingArgument(String),

    /// Command was given more trailing arguments than it takes
    #[error("Unexpected arguments: {0}")]
    UnexpectedArguments(String),

    /// A database, table or primary key name was empty
    #[error("Names must not be empty")]
    EmptyName,

    /// Table spec has fewer than two segments
    #[error("Need table in form {{db}}.{{table}}[.{{pk}}], got '{0}'")]
    MalformedTableSpec(String),

    /// Table spec has more than three segments
    #[error("Too many segments in table spec '{0}'")]
    TooManySegments(String),
}

/// Wire-level failures talking to a cluster node
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Socket errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Server refused the handshake
    #[error("Handshake rejected: {0}")]
    Handshake(String),

    /// Malformed or unexpected frame
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Query was rejected or failed on the server
    #[error("{kind} error: {message}")]
    Server {
        kind: ServerErrorKind,
        /// RethinkDB `ErrorType` code for runtime errors, if sent
        error_type: Option<u32>,
        message: String,
    },
}

/// Which stage of query processing failed on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorKind {
    Client,
    Compile,
    Runtime,
}

impl std::fmt::Display for ServerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerErrorKind::Client => write!(f, "Client"),
            ServerErrorKind::Compile => write!(f, "Compile"),
            ServerErrorKind::Runtime => write!(f, "Runtime"),
        }
    }
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Config file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Specialized Result type for dbtool operations
pub type Result<T> = std::result::Result<T, DbtoolError>;

/// Specialized Result type for ensure calls
pub type ProvisionResult<T> = std::result::Result<T, ProvisionError>;

/// Specialized Result type for wire operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized Result type for argument parsing
pub type ArgumentResult<T> = std::result::Result<T, ArgumentError>;
