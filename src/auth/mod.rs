//! # Auth Module
//!
//! Caller context and enforcement of the authorization rules declared on
//! each model. Token verification belongs to the hosting platform; this
//! module starts from an already-established `AuthContext`.

pub mod errors;
pub mod policy;

pub use errors::{AuthError, AuthResult};
pub use policy::{AuthContext, AuthorizationMode, Authorizer, Operation, RuleAuthorizer};
