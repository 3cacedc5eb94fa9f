//! CLI module
//!
//! Command-line interface over `PcoClient`.
//!
//! # Commands
//!
//! - `get` - Fetch a single URL
//! - `iterate` - Stream every object of a list endpoint
//! - `post` / `patch` - Send a JSON payload
//! - `delete` - Delete a resource

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
