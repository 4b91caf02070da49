//! Configuration management
//!
//! Handles the cluster endpoint and user settings.

pub mod endpoint;
pub mod settings;

pub use endpoint::ClusterEndpoint;
pub use settings::{Settings, load_settings};
