//! Typed client-facing records
//!
//! One struct per declared model, plus a create-input without `id` (the
//! backend generates it). Field names and optionality mirror the
//! declaration in `schema::concierge`.

mod types;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use types::{Booking, CreateBooking, CreateUserProfile, CreateWishlist, UserProfile, Wishlist};

/// The only `item_type` bookings currently carry
pub const ITEM_TYPE_PRODUCT: &str = "product";

/// A typed view of a declared model
pub trait Model: Serialize + DeserializeOwned {
    /// Declared model name
    const NAME: &'static str;
    /// Create-input type
    type Create: Serialize;
}

/// Product page URL for an ASIN
pub fn product_url(asin: &str) -> String {
    format!("https://www.amazon.com/dp/{}/?th=1", asin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{concierge_schema, validate_record};

    /// Every typed record must serialize into something its model accepts.
    #[test]
    fn test_typed_records_match_declaration() {
        let schema = concierge_schema();

        let profile = UserProfile {
            id: "p1".into(),
            user_id: "u1".into(),
            email: Some("a@example.com".into()),
            name: None,
            preferences: None,
            created_at: None,
            updated_at: None,
        };
        let item = Wishlist {
            id: "w1".into(),
            user_id: "u1".into(),
            asin: "B001".into(),
            title: "Widget".into(),
            price: "9.99".into(),
            reviews: Some("4.5".into()),
            url: None,
        };
        let booking = Booking {
            id: "b1".into(),
            user_id: "u1".into(),
            order_id: "o1".into(),
            item_type: ITEM_TYPE_PRODUCT.into(),
            title: "Widget".into(),
            price: "9.99".into(),
            purchase_date: None,
            asin: Some("B001".into()),
            url: None,
        };

        let cases = [
            (UserProfile::NAME, serde_json::to_value(&profile).unwrap()),
            (Wishlist::NAME, serde_json::to_value(&item).unwrap()),
            (Booking::NAME, serde_json::to_value(&booking).unwrap()),
        ];

        for (name, value) in cases {
            let model = schema.get_model(name).unwrap();
            assert!(validate_record(model, &value).is_ok(), "model {}", name);
        }
        assert!(booking.is_product());
    }
}
