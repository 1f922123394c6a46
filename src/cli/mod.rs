//! CLI module for concierge-data
//!
//! Provides command-line interface for:
//! - validate: Structural check of the declaration or an artifact
//! - compile: Write the schema artifact and SDL
//! - print: Print the compiled declaration
//! - check-record: Validate one record read from stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, PrintFormat};
pub use commands::{check_record, compile, print, run, run_command, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_ok};
