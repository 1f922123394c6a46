//! The concierge shopping declaration: UserProfile, Wishlist and Bookings.
//!
//! The three models are independent. They share the informal `user_id`
//! attribute and nothing else; there are no foreign keys and no cascades.

use super::types::{AuthRule, FieldDef, ModelDef, SchemaDef};

/// Declaration version recorded in compiled artifacts
pub const SCHEMA_VERSION: &str = "1";

/// Model names
pub const USER_PROFILE: &str = "UserProfile";
pub const WISHLIST: &str = "Wishlist";
pub const BOOKINGS: &str = "Bookings";

/// Shared attribute every model is indexed on
pub const USER_ID: &str = "user_id";

/// Builds the concierge declaration.
pub fn concierge_schema() -> SchemaDef {
    SchemaDef::new(SCHEMA_VERSION)
        .model(user_profile())
        .model(wishlist())
        .model(bookings())
}

/// User information and preferences. One profile per user is intended,
/// which the application enforces.
pub fn user_profile() -> ModelDef {
    ModelDef::new(USER_PROFILE)
        .describe("User information and preferences")
        .field(FieldDef::id())
        .field(FieldDef::required_string(USER_ID))
        .field(FieldDef::optional_string("email"))
        .field(FieldDef::optional_string("name"))
        // serialized JSON
        .field(FieldDef::optional_string("preferences"))
        .field(FieldDef::optional_string("created_at"))
        .field(FieldDef::optional_string("updated_at"))
        .index(USER_ID)
        .allow(AuthRule::Authenticated)
}

/// Cart items, many per user.
pub fn wishlist() -> ModelDef {
    ModelDef::new(WISHLIST)
        .describe("Cart items, many per user")
        .field(FieldDef::id())
        .field(FieldDef::required_string(USER_ID))
        .field(FieldDef::required_string("asin"))
        .field(FieldDef::required_string("title"))
        .field(FieldDef::required_string("price"))
        .field(FieldDef::optional_string("reviews"))
        .field(FieldDef::optional_string("url"))
        .index(USER_ID)
        .allow(AuthRule::Authenticated)
}

/// Purchase history (products only).
pub fn bookings() -> ModelDef {
    ModelDef::new(BOOKINGS)
        .describe("Purchase history, products only")
        .field(FieldDef::id())
        .field(FieldDef::required_string(USER_ID))
        .field(FieldDef::required_string("order_id"))
        .field(FieldDef::required_string("item_type"))
        .field(FieldDef::required_string("title"))
        .field(FieldDef::required_string("price"))
        .field(FieldDef::optional_string("purchase_date"))
        .field(FieldDef::optional_string("asin"))
        .field(FieldDef::optional_string("url"))
        .index(USER_ID)
        .allow(AuthRule::Authenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthorizationMode;

    fn required(model: &ModelDef) -> Vec<&str> {
        model.required_fields().map(|f| f.name.as_str()).collect()
    }

    fn all(model: &ModelDef) -> Vec<&str> {
        model.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_declaration_is_valid() {
        assert!(concierge_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_user_profile_matrix() {
        let model = user_profile();
        assert_eq!(
            all(&model),
            vec!["id", "user_id", "email", "name", "preferences", "created_at", "updated_at"]
        );
        assert_eq!(required(&model), vec!["id", "user_id"]);
    }

    #[test]
    fn test_wishlist_matrix() {
        let model = wishlist();
        assert_eq!(
            all(&model),
            vec!["id", "user_id", "asin", "title", "price", "reviews", "url"]
        );
        assert_eq!(required(&model), vec!["id", "user_id", "asin", "title", "price"]);
    }

    #[test]
    fn test_bookings_matrix() {
        let model = bookings();
        assert_eq!(
            all(&model),
            vec![
                "id",
                "user_id",
                "order_id",
                "item_type",
                "title",
                "price",
                "purchase_date",
                "asin",
                "url"
            ]
        );
        assert_eq!(
            required(&model),
            vec!["id", "user_id", "order_id", "item_type", "title", "price"]
        );
    }

    #[test]
    fn test_every_model_indexed_on_user_id_only() {
        for model in concierge_schema().models {
            let indexed: Vec<_> = model.indexed_fields().collect();
            assert_eq!(indexed, vec![USER_ID], "model {}", model.name);
        }
    }

    #[test]
    fn test_uniform_authenticated_policy() {
        let schema = concierge_schema();
        assert_eq!(schema.authorization_mode, AuthorizationMode::UserPool);
        for model in &schema.models {
            assert_eq!(model.auth_rules, vec![AuthRule::Authenticated]);
        }
    }
}
