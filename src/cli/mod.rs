//! CLI module for collview
//!
//! Provides command-line interface for:
//! - find / find-one: read through a view
//! - update / remove / upsert: mutate through a view, then save the data file
//! - explain: print the merged query
//! - views: list configured views

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Target};
pub use commands::{build_catalog, execute, run, run_command, Config, Operation, Request, ViewDefinition};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
