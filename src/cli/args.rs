//! CLI argument definitions using clap
//!
//! Commands:
//! - concierge-data validate [--schema <artifact>]
//! - concierge-data compile [--config <path>] [--out <dir>]
//! - concierge-data print [--format json|sdl]
//! - concierge-data check-record --model <name> [--schema <artifact>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

/// concierge-data - schema tooling for the concierge data layer
#[derive(Parser, Debug)]
#[command(name = "concierge-data")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the built-in declaration, or a compiled artifact
    Validate {
        /// Compiled artifact to check instead of the built-in declaration
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// Write schema.json and schema.graphql
    Compile {
        /// Output directory (overrides `output_dir` from the config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the compiled declaration to stdout
    Print {
        #[arg(long, value_enum, default_value_t = PrintFormat::Json)]
        format: PrintFormat,
    },

    /// Validate one JSON record read from stdin
    CheckRecord {
        /// Model the record belongs to
        #[arg(long)]
        model: String,

        /// Compiled artifact to validate against
        #[arg(long)]
        schema: Option<PathBuf>,
    },
}

/// Output format for `print`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrintFormat {
    Json,
    Sdl,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
