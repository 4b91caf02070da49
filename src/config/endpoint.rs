//! Cluster endpoint
//!
//! The host/port pair a session is opened against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default RethinkDB client driver port
pub const DEFAULT_PORT: u16 = 28015;

/// Default cluster host
pub const DEFAULT_HOST: &str = "localhost";

/// Address of one cluster node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterEndpoint {
    /// Node host name or IP
    #[serde(default = "default_host")]
    pub host: String,

    /// Client driver port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ClusterEndpoint {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ClusterEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Build the `host:port` address used for the TCP connect
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ClusterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())
    }
}
