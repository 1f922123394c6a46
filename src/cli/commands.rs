//! CLI command implementations
//!
//! Every command loads the configuration first. Command output goes to
//! stdout as JSON (or SDL for `print --format sdl`); logs go to stderr.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::config::{Config, ConfigSource};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{concierge_schema, SchemaArtifact, SchemaRegistry, SchemaValidator};

use super::args::{Cli, Command, PrintFormat};
use super::errors::CliResult;
use super::io::{read_request, write_error, write_ok, write_text, write_value};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let (config, source) = Config::load(&cli.config)?;
    init_logging(&config, &cli.config, source)?;
    run_command(cli.command, &config)
}

/// Applies the configured log level, then records where the config came from
fn init_logging(config: &Config, path: &Path, source: ConfigSource) -> CliResult<()> {
    Logger::set_min_severity(config.log_severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", &path.display().to_string()), ("source", source.as_str())],
    );
    Ok(())
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &Config) -> CliResult<()> {
    match cmd {
        Command::Validate { schema } => validate(schema.as_deref()),
        Command::Compile { out } => compile(config, out),
        Command::Print { format } => print(format),
        Command::CheckRecord { model, schema } => check_record(&model, schema.as_deref()),
    }
}

/// Structurally check the built-in declaration or an artifact file
pub fn validate(schema: Option<&Path>) -> CliResult<()> {
    let registry = load_registry(schema)?;
    let artifact = SchemaArtifact::compile(registry.schema_def())?;

    write_value(&json!({
        "status": "ok",
        "version": registry.version(),
        "models": registry.models().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        "fingerprint": artifact.fingerprint,
    }))
}

/// Write `schema.json` and `schema.graphql` to the output directory
pub fn compile(config: &Config, out: Option<PathBuf>) -> CliResult<()> {
    let dir = out.unwrap_or_else(|| config.output_dir.clone());
    let registry = SchemaRegistry::from_schema(concierge_schema())?;
    let path = registry.save_artifact(&dir)?;

    write_value(&json!({
        "status": "ok",
        "artifact": path.display().to_string(),
    }))
}

/// Print the compiled built-in declaration
pub fn print(format: PrintFormat) -> CliResult<()> {
    let artifact = SchemaArtifact::compile(&concierge_schema())?;

    match format {
        PrintFormat::Json => write_text(&artifact.to_json_pretty()?),
        PrintFormat::Sdl => write_text(&artifact.to_sdl()),
    }
}

/// Validate one record from stdin against a model
pub fn check_record(model: &str, schema: Option<&Path>) -> CliResult<()> {
    let registry = load_registry(schema)?;
    let record = read_request()?;

    match SchemaValidator::new(&registry).validate_record(model, &record) {
        Ok(()) => write_ok(),
        Err(e) => write_error(e.code().code(), e.message()),
    }
}

fn load_registry(schema: Option<&Path>) -> CliResult<SchemaRegistry> {
    let registry = match schema {
        Some(path) => SchemaRegistry::load_artifact(path)?,
        None => SchemaRegistry::from_schema(concierge_schema())?,
    };
    Ok(registry)
}
