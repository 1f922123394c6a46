//! Record validation against a model definition
//!
//! Validation semantics:
//! - The record is a JSON object
//! - No undeclared fields exist
//! - Required fields are present and non-null
//! - Optional fields may be absent or null
//! - Present values are strings (ID and String are both carried as strings)
//! - `id` is non-empty
//!
//! The validator never mutates records.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::registry::SchemaRegistry;
use super::types::{FieldDef, FieldType, ModelDef, ID_FIELD};

/// Schema validator that enforces model rules on records.
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a new validator backed by the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates a full record against the named model.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if:
    /// - The model is not registered (DATA_UNKNOWN_MODEL)
    /// - The record violates the model (DATA_SCHEMA_VALIDATION_FAILED)
    pub fn validate_record(&self, model: &str, record: &Value) -> SchemaResult<()> {
        let def = self.model(model)?;
        validate_record(def, record)
    }

    /// Validates an update patch for an existing record.
    ///
    /// Fields absent from the patch are left untouched, so only the fields
    /// present are checked. Required fields may not be cleared and `id`
    /// may not change.
    pub fn validate_patch(&self, model: &str, existing_id: &str, patch: &Value) -> SchemaResult<()> {
        let def = self.model(model)?;
        validate_patch(def, existing_id, patch)
    }

    fn model(&self, model: &str) -> SchemaResult<&ModelDef> {
        self.registry
            .get(model)
            .ok_or_else(|| SchemaError::unknown_model(model))
    }
}

/// Validates a full record against a model definition.
pub fn validate_record(model: &ModelDef, record: &Value) -> SchemaResult<()> {
    let obj = as_object(model, record)?;
    reject_undeclared(model, obj)?;

    for field in &model.fields {
        match obj.get(&field.name) {
            None if field.required => {
                return Err(fail(model, ValidationDetails::missing_field(&field.name)));
            }
            None => {}
            Some(value) => validate_value(model, field, value)?,
        }
    }

    Ok(())
}

/// Validates an update patch against a model definition.
pub fn validate_patch(model: &ModelDef, existing_id: &str, patch: &Value) -> SchemaResult<()> {
    let obj = as_object(model, patch)?;
    reject_undeclared(model, obj)?;

    for (key, value) in obj {
        // Declared, checked above
        let Some(field) = model.get_field(key) else {
            continue;
        };
        validate_value(model, field, value)?;

        if field.name == ID_FIELD && value.as_str() != Some(existing_id) {
            return Err(fail(
                model,
                ValidationDetails::new(
                    ID_FIELD,
                    format!("immutable value '{}'", existing_id),
                    format!("attempted change to {}", value),
                ),
            ));
        }
    }

    Ok(())
}

fn as_object<'v>(model: &ModelDef, value: &'v Value) -> SchemaResult<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        fail(
            model,
            ValidationDetails::type_mismatch("$root", "object", json_type_name(value)),
        )
    })
}

fn reject_undeclared(model: &ModelDef, obj: &Map<String, Value>) -> SchemaResult<()> {
    match obj.keys().find(|key| !model.has_field(key)) {
        Some(extra) => Err(fail(model, ValidationDetails::extra_field(extra.as_str()))),
        None => Ok(()),
    }
}

fn validate_value(model: &ModelDef, field: &FieldDef, value: &Value) -> SchemaResult<()> {
    if value.is_null() {
        if field.required {
            return Err(fail(model, ValidationDetails::null_value(&field.name)));
        }
        return Ok(());
    }

    let Some(s) = value.as_str() else {
        return Err(fail(
            model,
            ValidationDetails::type_mismatch(
                &field.name,
                field.field_type.type_name(),
                json_type_name(value),
            ),
        ));
    };

    if field.field_type == FieldType::Id && s.is_empty() {
        return Err(fail(
            model,
            ValidationDetails::new(&field.name, "non-empty identifier", "empty string"),
        ));
    }

    Ok(())
}

fn fail(model: &ModelDef, details: ValidationDetails) -> SchemaError {
    SchemaError::validation_failed(&model.name, details)
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::concierge_schema;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_schema(concierge_schema()).unwrap()
    }

    #[test]
    fn test_valid_wishlist_passes() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let record = json!({
            "id": "w-1",
            "user_id": "u1",
            "asin": "B001",
            "title": "Widget",
            "price": "9.99"
        });

        assert!(validator.validate_record("Wishlist", &record).is_ok());
    }

    #[test]
    fn test_optional_fields_may_be_null() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let record = json!({
            "id": "p-1",
            "user_id": "u1",
            "email": null,
            "preferences": "{\"theme\":\"dark\"}"
        });

        assert!(validator.validate_record("UserProfile", &record).is_ok());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let record = json!({
            "id": "b-1",
            "user_id": "u1",
            "order_id": "o-1",
            "title": "Widget",
            "price": "9.99"
        });

        let err = validator.validate_record("Bookings", &record).unwrap_err();
        assert_eq!(err.code().code(), "DATA_SCHEMA_VALIDATION_FAILED");
        assert_eq!(err.details().unwrap().field, "item_type");
    }

    #[test]
    fn test_required_null_fails() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let record = json!({ "id": "p-1", "user_id": null });
        let err = validator.validate_record("UserProfile", &record).unwrap_err();
        assert_eq!(err.details().unwrap().actual, "null");
    }

    #[test]
    fn test_extra_field_fails() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let record = json!({ "id": "p-1", "user_id": "u1", "owner": "someone" });
        let err = validator.validate_record("UserProfile", &record).unwrap_err();
        assert_eq!(err.details().unwrap().field, "owner");
    }

    #[test]
    fn test_type_mismatch_fails() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let record = json!({
            "id": "w-1",
            "user_id": "u1",
            "asin": "B001",
            "title": "Widget",
            "price": 9.99
        });

        let err = validator.validate_record("Wishlist", &record).unwrap_err();
        let details = err.details().unwrap();
        assert_eq!(details.field, "price");
        assert_eq!(details.expected, "String");
        assert_eq!(details.actual, "float");
    }

    #[test]
    fn test_empty_id_fails() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let record = json!({ "id": "", "user_id": "u1" });
        assert!(validator.validate_record("UserProfile", &record).is_err());
    }

    #[test]
    fn test_non_object_fails() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let err = validator.validate_record("UserProfile", &json!(["u1"])).unwrap_err();
        assert_eq!(err.details().unwrap().field, "$root");
    }

    #[test]
    fn test_unknown_model_rejected() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let err = validator.validate_record("Cart", &json!({})).unwrap_err();
        assert_eq!(err.code().code(), "DATA_UNKNOWN_MODEL");
    }

    #[test]
    fn test_patch_may_omit_required_fields() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let patch = json!({ "price": "7.50", "reviews": null });
        assert!(validator.validate_patch("Wishlist", "w-1", &patch).is_ok());
    }

    #[test]
    fn test_patch_cannot_clear_required_field() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let patch = json!({ "title": null });
        assert!(validator.validate_patch("Wishlist", "w-1", &patch).is_err());
    }

    #[test]
    fn test_patch_cannot_change_id() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let err = validator
            .validate_patch("Wishlist", "w-1", &json!({ "id": "w-2" }))
            .unwrap_err();
        assert!(err.message().contains("immutable"));

        assert!(validator
            .validate_patch("Wishlist", "w-1", &json!({ "id": "w-1" }))
            .is_ok());
    }
}
