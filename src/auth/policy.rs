//! # Authorization policy
//!
//! Evaluates the rules a model declares against the caller context.
//!
//! The concierge declaration uses a single rule everywhere: authenticated
//! callers may perform every operation, anonymous callers nothing. There is
//! no field-level or row-level restriction.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use crate::schema::{AuthRule, ModelDef};

/// Caller context carried with each request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated subject (user pool `sub`), None if anonymous
    pub subject: Option<String>,
}

impl AuthContext {
    /// Context for an authenticated caller
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    /// Context for anonymous access
    pub fn anonymous() -> Self {
        Self { subject: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    /// Get the subject or error if not authenticated
    pub fn require_subject(&self) -> AuthResult<&str> {
        self.subject
            .as_deref()
            .ok_or(AuthError::AuthenticationRequired)
    }
}

/// Operations a generated API exposes per model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default authorization mode of a schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationMode {
    /// Callers authenticate against a user pool
    #[default]
    #[serde(rename = "userPool")]
    UserPool,
}

impl AuthorizationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationMode::UserPool => "userPool",
        }
    }
}

/// Authorizer trait
pub trait Authorizer: Send + Sync {
    /// Decide whether `ctx` may perform `operation` on `model`
    fn authorize(&self, model: &ModelDef, operation: Operation, ctx: &AuthContext) -> AuthResult<()>;
}

/// Authorizer that evaluates the rules declared on each model
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAuthorizer;

impl RuleAuthorizer {
    pub fn new() -> Self {
        Self
    }

    fn rule_allows(rule: AuthRule, _operation: Operation, ctx: &AuthContext) -> bool {
        match rule {
            AuthRule::Authenticated => ctx.is_authenticated(),
        }
    }
}

impl Authorizer for RuleAuthorizer {
    fn authorize(&self, model: &ModelDef, operation: Operation, ctx: &AuthContext) -> AuthResult<()> {
        if model.auth_rules.is_empty() {
            return Err(AuthError::NoRules(model.name.clone()));
        }

        let allowed = model
            .auth_rules
            .iter()
            .any(|rule| Self::rule_allows(*rule, operation, ctx));

        if allowed {
            return Ok(());
        }

        if !ctx.is_authenticated() {
            return Err(AuthError::AuthenticationRequired);
        }

        Err(AuthError::Unauthorized {
            model: model.name.clone(),
            operation,
        })
    }
}
