//! Model registry
//!
//! Holds the loaded declaration in memory. Models are registered once and
//! never replaced. The registry can be built from a `SchemaDef` literal or
//! loaded from a compiled artifact on disk (`<dir>/schema.json`).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::artifact::SchemaArtifact;
use super::errors::{SchemaError, SchemaResult};
use super::types::{ModelDef, SchemaDef};
use crate::observability::{log_event_with_fields, Event};

/// File name of the compiled JSON artifact
pub const ARTIFACT_FILE: &str = "schema.json";

/// File name of the rendered SDL
pub const SDL_FILE: &str = "schema.graphql";

/// In-memory registry of model definitions.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    /// Declaration, models kept in registration order
    schema: SchemaDef,
    /// Model name -> position in `schema.models`
    positions: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Creates an empty registry for the given schema version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            schema: SchemaDef::new(version),
            positions: HashMap::new(),
        }
    }

    /// Builds a registry from a full declaration.
    ///
    /// The declaration is checked as a whole before any model is registered.
    pub fn from_schema(schema: SchemaDef) -> SchemaResult<Self> {
        schema
            .validate_structure()
            .map_err(SchemaError::invalid_schema)?;

        let mut registry = Self::new(schema.version.clone());
        registry.schema.authorization_mode = schema.authorization_mode;
        for model in schema.models {
            registry.register(model)?;
        }

        let count = registry.model_count().to_string();
        log_event_with_fields(
            Event::SchemaLoaded,
            &[("version", registry.version()), ("models", &count)],
        );

        Ok(registry)
    }

    /// Registers a single model.
    ///
    /// Rejects structurally invalid models and models already registered.
    pub fn register(&mut self, model: ModelDef) -> SchemaResult<()> {
        model
            .validate_structure()
            .map_err(SchemaError::invalid_schema)?;

        if self.positions.contains_key(&model.name) {
            return Err(SchemaError::model_immutable(&model.name));
        }

        self.positions
            .insert(model.name.clone(), self.schema.models.len());
        self.schema.models.push(model);
        Ok(())
    }

    /// Gets a model by name.
    pub fn get(&self, model: &str) -> Option<&ModelDef> {
        self.positions
            .get(model)
            .and_then(|&pos| self.schema.models.get(pos))
    }

    /// Gets a model by name or fails with DATA_UNKNOWN_MODEL.
    pub fn require(&self, model: &str) -> SchemaResult<&ModelDef> {
        self.get(model).ok_or_else(|| SchemaError::unknown_model(model))
    }

    pub fn exists(&self, model: &str) -> bool {
        self.positions.contains_key(model)
    }

    /// Returns all models in registration order.
    pub fn models(&self) -> impl Iterator<Item = &ModelDef> {
        self.schema.models.iter()
    }

    pub fn model_count(&self) -> usize {
        self.schema.models.len()
    }

    pub fn version(&self) -> &str {
        &self.schema.version
    }

    /// Returns the declaration this registry holds.
    pub fn schema_def(&self) -> &SchemaDef {
        &self.schema
    }

    /// Loads a registry from a compiled artifact file.
    ///
    /// The fingerprint stored in the file must match its contents.
    pub fn load_artifact(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_artifact(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let artifact: SchemaArtifact = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_artifact(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        artifact.verify().map_err(|reason| {
            SchemaError::malformed_artifact(path.display().to_string(), reason)
        })?;

        Self::from_schema(artifact.schema)
    }

    /// Compiles the registry and writes `schema.json` and `schema.graphql`
    /// into `dir`, creating it if needed. Existing files are replaced.
    ///
    /// Returns the path of the JSON artifact.
    pub fn save_artifact(&self, dir: &Path) -> SchemaResult<PathBuf> {
        let artifact = SchemaArtifact::compile(&self.schema)?;

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                SchemaError::malformed_artifact(
                    dir.display().to_string(),
                    format!("Failed to create output directory: {}", e),
                )
            })?;
        }

        let json_path = dir.join(ARTIFACT_FILE);
        let content = artifact.to_json_pretty()?;
        write_file(&json_path, &content)?;

        let sdl_path = dir.join(SDL_FILE);
        write_file(&sdl_path, &artifact.to_sdl())?;

        log_event_with_fields(
            Event::ArtifactWritten,
            &[
                ("fingerprint", &artifact.fingerprint),
                ("path", &json_path.display().to_string()),
            ],
        );

        Ok(json_path)
    }
}

fn write_file(path: &Path, content: &str) -> SchemaResult<()> {
    fs::write(path, content).map_err(|e| {
        SchemaError::malformed_artifact(
            path.display().to_string(),
            format!("Failed to write file: {}", e),
        )
    })
}
