//! Schema error types
//!
//! Error codes:
//! - DATA_UNKNOWN_MODEL (REJECT)
//! - DATA_INVALID_SCHEMA (FATAL)
//! - DATA_SCHEMA_VALIDATION_FAILED (REJECT)
//! - DATA_MODEL_IMMUTABLE (REJECT)
//! - DATA_MALFORMED_ARTIFACT (FATAL)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
    /// The declaration itself is unusable; tooling must stop
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Model name not registered
    UnknownModel,
    /// Declaration fails structural checks
    InvalidSchema,
    /// Record violates its model
    ValidationFailed,
    /// Attempt to re-register an existing model
    ModelImmutable,
    /// Artifact file missing, unreadable or corrupt
    MalformedArtifact,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownModel => "DATA_UNKNOWN_MODEL",
            SchemaErrorCode::InvalidSchema => "DATA_INVALID_SCHEMA",
            SchemaErrorCode::ValidationFailed => "DATA_SCHEMA_VALIDATION_FAILED",
            SchemaErrorCode::ModelImmutable => "DATA_MODEL_IMMUTABLE",
            SchemaErrorCode::MalformedArtifact => "DATA_MALFORMED_ARTIFACT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::InvalidSchema | SchemaErrorCode::MalformedArtifact => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field name, or `$root` for the record itself
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    model: Option<String>,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create an unknown model error
    pub fn unknown_model(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            code: SchemaErrorCode::UnknownModel,
            message: format!("Model '{}' not found", model),
            model: Some(model),
            details: None,
        }
    }

    /// Create an invalid structure error
    pub fn invalid_schema(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::InvalidSchema,
            message: format!("Invalid schema: {}", reason.into()),
            model: None,
            details: None,
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(model: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::ValidationFailed,
            message: format!("Record validation failed: {}", details),
            model: Some(model.into()),
            details: Some(details),
        }
    }

    /// Create a model immutable error
    pub fn model_immutable(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            code: SchemaErrorCode::ModelImmutable,
            message: format!("Model '{}' is already registered and immutable", model),
            model: Some(model),
            details: None,
        }
    }

    /// Create an error for a malformed artifact file
    pub fn malformed_artifact(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedArtifact,
            message: format!("Malformed schema artifact '{}': {}", path.into(), reason.into()),
            model: None,
            details: None,
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the model name if applicable
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(SchemaErrorCode::UnknownModel.code(), "DATA_UNKNOWN_MODEL");
        assert_eq!(SchemaErrorCode::ValidationFailed.code(), "DATA_SCHEMA_VALIDATION_FAILED");
        assert_eq!(SchemaErrorCode::ModelImmutable.code(), "DATA_MODEL_IMMUTABLE");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::ValidationFailed.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::InvalidSchema.severity(), Severity::Fatal);
        assert!(SchemaError::malformed_artifact("x.json", "bad").is_fatal());
    }

    #[test]
    fn test_validation_error_display() {
        let err = SchemaError::validation_failed("Wishlist", ValidationDetails::missing_field("asin"));
        let display = err.to_string();
        assert!(display.contains("DATA_SCHEMA_VALIDATION_FAILED"));
        assert!(display.contains("asin"));
        assert_eq!(err.model(), Some("Wishlist"));
    }
}
