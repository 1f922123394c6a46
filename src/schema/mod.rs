//! Schema declaration subsystem
//!
//! Models are declared once, checked structurally, and then consumed by the
//! validator, the artifact compiler and the reference backend.
//!
//! # Design Principles
//!
//! - Declaration order is preserved
//! - Registered models are immutable
//! - Record validation never mutates records
//! - Optional means "absent or null", required means "present and non-null"

mod artifact;
mod concierge;
mod errors;
mod registry;
mod types;
mod validator;

pub use artifact::{fingerprint, SchemaArtifact, ARTIFACT_VERSION};
pub use concierge::{
    bookings, concierge_schema, user_profile, wishlist, BOOKINGS, SCHEMA_VERSION, USER_ID,
    USER_PROFILE, WISHLIST,
};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationDetails};
pub use registry::{SchemaRegistry, ARTIFACT_FILE, SDL_FILE};
pub use types::{AuthRule, FieldDef, FieldType, IndexDef, ModelDef, SchemaDef, ID_FIELD};
pub use validator::{validate_patch, validate_record, SchemaValidator};
pub(crate) use validator::json_type_name;
