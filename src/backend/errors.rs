//! # Backend Errors

use thiserror::Error;

use crate::auth::AuthError;
use crate::index::IndexError;
use crate::schema::SchemaError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend errors
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    // ==================
    // Client Errors
    // ==================
    /// Unknown model or record failed validation
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// Authorization denied
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Query on an undeclared index
    #[error("{0}")]
    Index(#[from] IndexError),

    /// Record not found
    #[error("Record {model}/{id} not found")]
    NotFound { model: String, id: String },

    /// Create input carried an id
    #[error("Field 'id' is system-generated and cannot be supplied")]
    IdSystemGenerated,

    /// Pagination token not issued by this backend
    #[error("Invalid next token: {0}")]
    InvalidNextToken(String),

    /// Page limit out of range
    #[error("Limit {limit} outside 1..={max}")]
    InvalidLimit { limit: usize, max: usize },

    // ==================
    // Internal Errors
    // ==================
    /// Typed record conversion failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (poisoned lock)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackendError {
    pub fn not_found(model: impl Into<String>, id: impl Into<String>) -> Self {
        BackendError::NotFound {
            model: model.into(),
            id: id.into(),
        }
    }

    /// Returns the HTTP-equivalent status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            BackendError::Schema(err) if err.is_fatal() => 500,
            BackendError::Schema(err) => match err.code() {
                crate::schema::SchemaErrorCode::UnknownModel => 404,
                _ => 400,
            },
            BackendError::Auth(err) => err.status_code(),
            BackendError::Index(_) => 400,
            BackendError::NotFound { .. } => 404,
            BackendError::IdSystemGenerated => 400,
            BackendError::InvalidNextToken(_) => 400,
            BackendError::InvalidLimit { .. } => 400,
            BackendError::Serialization(_) => 500,
            BackendError::Internal(_) => 500,
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::Schema(err) => err.code().code(),
            BackendError::Auth(AuthError::AuthenticationRequired) => "DATA_AUTHENTICATION_REQUIRED",
            BackendError::Auth(_) => "DATA_UNAUTHORIZED",
            BackendError::Index(err) => err.code(),
            BackendError::NotFound { .. } => "DATA_NOT_FOUND",
            BackendError::IdSystemGenerated => "DATA_ID_SYSTEM_GENERATED",
            BackendError::InvalidNextToken(_) => "DATA_INVALID_NEXT_TOKEN",
            BackendError::InvalidLimit { .. } => "DATA_INVALID_LIMIT",
            BackendError::Serialization(_) => "DATA_SERIALIZATION",
            BackendError::Internal(_) => "DATA_INTERNAL",
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationDetails;

    #[test]
    fn test_status_codes() {
        assert_eq!(BackendError::not_found("Wishlist", "w1").status_code(), 404);
        assert_eq!(BackendError::IdSystemGenerated.status_code(), 400);
        assert_eq!(BackendError::Internal("x".into()).status_code(), 500);
        assert_eq!(
            BackendError::from(SchemaError::unknown_model("Cart")).status_code(),
            404
        );
    }

    #[test]
    fn test_auth_error_propagation() {
        let err = BackendError::from(AuthError::AuthenticationRequired);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.code(), "DATA_AUTHENTICATION_REQUIRED");
    }

    #[test]
    fn test_schema_error_code_passthrough() {
        let err = BackendError::from(SchemaError::validation_failed(
            "Wishlist",
            ValidationDetails::missing_field("asin"),
        ));
        assert_eq!(err.code(), "DATA_SCHEMA_VALIDATION_FAILED");
        assert_eq!(err.status_code(), 400);
    }
}
