//! Schema type definitions
//!
//! Supported field types:
//! - ID: system-generated unique identifier (primary key)
//! - String: UTF-8 string
//!
//! Models keep their fields in declaration order. Everything downstream
//! (artifact, SDL, typed records) relies on that order.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::AuthorizationMode;

/// Name of the primary key field every model must declare.
pub const ID_FIELD: &str = "id";

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Unique identifier, generated by the backend
    #[serde(rename = "ID")]
    Id,
    /// UTF-8 string
    String,
}

impl FieldType {
    /// Returns the type name used in artifacts and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Id => "ID",
            FieldType::String => "String",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name (snake_case)
    pub name: String,
    /// Field data type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether field must be present and non-null
    pub required: bool,
}

impl FieldDef {
    /// The required primary key field
    pub fn id() -> Self {
        Self {
            name: ID_FIELD.to_string(),
            field_type: FieldType::Id,
            required: true,
        }
    }

    /// Create a required string field
    pub fn required_string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::String,
            required: true,
        }
    }

    /// Create an optional string field
    pub fn optional_string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::String,
            required: false,
        }
    }
}

/// Secondary index over a single attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Indexed field name
    pub field: String,
}

impl IndexDef {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

/// Authorization rule attached to a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthRule {
    /// Any authenticated caller may create, read, update and delete
    Authenticated,
}

/// A named record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDef {
    /// Model name (PascalCase)
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions in declaration order
    pub fields: Vec<FieldDef>,
    /// Secondary indexes
    #[serde(default)]
    pub secondary_indexes: Vec<IndexDef>,
    /// Authorization rules
    pub auth_rules: Vec<AuthRule>,
}

impl ModelDef {
    /// Creates an empty model. Use the builder methods to add fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            secondary_indexes: Vec::new(),
            auth_rules: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn index(mut self, field: impl Into<String>) -> Self {
        self.secondary_indexes.push(IndexDef::new(field));
        self
    }

    pub fn allow(mut self, rule: AuthRule) -> Self {
        self.auth_rules.push(rule);
        self
    }

    /// Looks up a field definition by name
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Returns required fields in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Returns whether a secondary index exists on `field`
    pub fn is_indexed(&self, field: &str) -> bool {
        self.secondary_indexes.iter().any(|idx| idx.field == field)
    }

    /// Names of indexed fields in declaration order
    pub fn indexed_fields(&self) -> impl Iterator<Item = &str> {
        self.secondary_indexes.iter().map(|idx| idx.field.as_str())
    }

    /// Validates the model structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if !model_name_pattern().is_match(&self.name) {
            return Err(format!(
                "Model name '{}' must be PascalCase",
                self.name
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !field_name_pattern().is_match(&field.name) {
                return Err(format!(
                    "Field '{}.{}' must be a snake_case identifier",
                    self.name, field.name
                ));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("Field '{}.{}' declared twice", self.name, field.name));
            }
            if field.field_type == FieldType::Id && field.name != ID_FIELD {
                return Err(format!(
                    "Field '{}.{}' uses ID but only '{}' may",
                    self.name, field.name, ID_FIELD
                ));
            }
        }

        // Primary key
        match self.get_field(ID_FIELD) {
            None => {
                return Err(format!("Model '{}' must define an '{}' field", self.name, ID_FIELD));
            }
            Some(id) if id.field_type != FieldType::Id => {
                return Err(format!("'{}.{}' must be of type ID", self.name, ID_FIELD));
            }
            Some(id) if !id.required => {
                return Err(format!("'{}.{}' must be required", self.name, ID_FIELD));
            }
            Some(_) => {}
        }

        let mut indexed = HashSet::new();
        for idx in &self.secondary_indexes {
            let field = self.get_field(&idx.field).ok_or_else(|| {
                format!(
                    "Index on '{}.{}' references an undeclared field",
                    self.name, idx.field
                )
            })?;
            if field.field_type != FieldType::String || !field.required {
                return Err(format!(
                    "Index on '{}.{}' requires a required String field",
                    self.name, idx.field
                ));
            }
            if !indexed.insert(idx.field.as_str()) {
                return Err(format!("Field '{}.{}' indexed twice", self.name, idx.field));
            }
        }

        if self.auth_rules.is_empty() {
            return Err(format!("Model '{}' declares no authorization rule", self.name));
        }

        Ok(())
    }
}

/// Complete schema declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDef {
    /// Schema version
    pub version: String,
    /// Default authorization mode applied to every model
    #[serde(default)]
    pub authorization_mode: AuthorizationMode,
    /// Models in declaration order
    pub models: Vec<ModelDef>,
}

impl SchemaDef {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            authorization_mode: AuthorizationMode::default(),
            models: Vec::new(),
        }
    }

    pub fn model(mut self, model: ModelDef) -> Self {
        self.models.push(model);
        self
    }

    pub fn get_model(&self, name: &str) -> Option<&ModelDef> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Validates every model plus cross-model constraints
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.models.is_empty() {
            return Err("Schema declares no models".into());
        }

        let mut names = HashSet::new();
        for model in &self.models {
            if !names.insert(model.name.as_str()) {
                return Err(format!("Model '{}' declared twice", model.name));
            }
            model.validate_structure()?;
        }

        Ok(())
    }
}

fn model_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("static regex"))
}

fn field_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("static regex"))
}
