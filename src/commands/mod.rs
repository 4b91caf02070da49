//! Command parsing and execution
//!
//! Handles the `ensure_database` / `ensure_table` command surface.

pub mod handlers;
pub mod parser;

pub use handlers::{HELP_TEXT, Report, execute_command};
pub use parser::{Command, parse_command};
