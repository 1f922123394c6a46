//! Index error types

use thiserror::Error;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Index errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Lookup on a field the model does not index
    #[error("Model {model} has no secondary index on '{field}'")]
    NotIndexed { model: String, field: String },
}

impl IndexError {
    pub fn not_indexed(model: impl Into<String>, field: impl Into<String>) -> Self {
        IndexError::NotIndexed {
            model: model.into(),
            field: field.into(),
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::NotIndexed { .. } => "DATA_NOT_INDEXED",
        }
    }
}
