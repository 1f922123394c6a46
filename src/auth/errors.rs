//! # Auth Errors
//!
//! Error types for the authorization module.

use thiserror::Error;

use super::policy::Operation;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authorization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Caller must be authenticated
    #[error("Authentication required")]
    AuthenticationRequired,

    /// No declared rule grants the operation
    #[error("Not authorized to {operation} {model}")]
    Unauthorized { model: String, operation: Operation },

    /// Model declares no rules at all
    #[error("Model {0} declares no authorization rules")]
    NoRules(String),
}

impl AuthError {
    /// Returns the HTTP-equivalent status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::AuthenticationRequired => 401,
            AuthError::Unauthorized { .. } => 403,
            AuthError::NoRules(_) => 500,
        }
    }

    /// Returns whether this error was caused by the caller
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
