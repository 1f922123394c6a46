//! Compiled schema artifact
//!
//! The artifact is what a code/API generator consumes: the declaration as
//! JSON plus a SHA-256 fingerprint over its canonical serialization, and an
//! SDL rendering of the same models.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::errors::{SchemaError, SchemaResult};
use super::types::{AuthRule, ModelDef, SchemaDef};
use crate::observability::{log_event_with_fields, Event};

/// Artifact layout version
pub const ARTIFACT_VERSION: &str = "1";

/// Compiled, fingerprinted schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaArtifact {
    /// Artifact layout version (not the schema version)
    pub version: String,
    /// Hex SHA-256 of the serialized `schema`
    pub fingerprint: String,
    /// Compilation time
    pub generated_at: DateTime<Utc>,
    /// The declaration
    pub schema: SchemaDef,
}

impl SchemaArtifact {
    /// Compiles a declaration into an artifact.
    ///
    /// Structurally invalid declarations are refused (DATA_INVALID_SCHEMA).
    pub fn compile(schema: &SchemaDef) -> SchemaResult<Self> {
        schema
            .validate_structure()
            .map_err(SchemaError::invalid_schema)?;

        let fingerprint = fingerprint(schema)?;

        log_event_with_fields(
            Event::SchemaCompiled,
            &[("fingerprint", &fingerprint), ("version", &schema.version)],
        );

        Ok(Self {
            version: ARTIFACT_VERSION.to_string(),
            fingerprint,
            generated_at: Utc::now(),
            schema: schema.clone(),
        })
    }

    /// Checks the stored fingerprint against the stored schema.
    pub fn verify(&self) -> Result<(), String> {
        if self.version != ARTIFACT_VERSION {
            return Err(format!("unsupported artifact version '{}'", self.version));
        }

        let actual = fingerprint(&self.schema).map_err(|e| e.message().to_string())?;
        if actual != self.fingerprint {
            return Err(format!(
                "fingerprint mismatch: stored {}, computed {}",
                self.fingerprint, actual
            ));
        }

        Ok(())
    }

    /// Serializes the artifact as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> SchemaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SchemaError::malformed_artifact("<in-memory>", format!("Failed to serialize: {}", e))
        })
    }

    /// Renders the models as GraphQL-style SDL.
    pub fn to_sdl(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "# schema version {} ({}), fingerprint {}",
            self.schema.version,
            self.schema.authorization_mode.as_str(),
            self.fingerprint
        );

        for model in &self.schema.models {
            out.push('\n');
            render_model(&mut out, model);
        }

        out
    }
}

/// Computes the hex SHA-256 fingerprint of a declaration.
///
/// Models and fields are vectors, so serialization order is the
/// declaration order and the fingerprint is stable.
pub fn fingerprint(schema: &SchemaDef) -> SchemaResult<String> {
    let bytes = serde_json::to_vec(schema).map_err(|e| {
        SchemaError::malformed_artifact("<in-memory>", format!("Failed to serialize: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn render_model(out: &mut String, model: &ModelDef) {
    if let Some(description) = &model.description {
        let _ = writeln!(out, "# {}", description);
    }

    let rules: Vec<&str> = model
        .auth_rules
        .iter()
        .map(|rule| match rule {
            AuthRule::Authenticated => "{ allow: private }",
        })
        .collect();

    let _ = writeln!(
        out,
        "type {} @model @auth(rules: [{}]) {{",
        model.name,
        rules.join(", ")
    );

    for field in &model.fields {
        let bang = if field.required { "!" } else { "" };
        let index = if model.is_indexed(&field.name) {
            " @index"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {}: {}{}{}",
            field.name,
            field.field_type.type_name(),
            bang,
            index
        );
    }

    out.push_str("}\n");
}
