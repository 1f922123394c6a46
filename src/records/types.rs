//! Typed records and create inputs for the concierge models

use serde::{Deserialize, Serialize};

use super::{product_url, Model, ITEM_TYPE_PRODUCT};
use crate::schema::{BOOKINGS, USER_PROFILE, WISHLIST};

/// User information and preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Serialized JSON
    #[serde(default)]
    pub preferences: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl UserProfile {
    /// Parses `preferences` as JSON. Absent preferences yield `None`.
    pub fn preferences_json(&self) -> Option<serde_json::Result<serde_json::Value>> {
        self.preferences.as_deref().map(serde_json::from_str)
    }
}

/// Input for creating a `UserProfile`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateUserProfile {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl CreateUserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Stores `preferences` serialized as a JSON string
    pub fn with_preferences(mut self, preferences: &serde_json::Value) -> Self {
        self.preferences = Some(preferences.to_string());
        self
    }
}

impl Model for UserProfile {
    const NAME: &'static str = USER_PROFILE;
    type Create = CreateUserProfile;
}

/// Cart item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    pub id: String,
    pub user_id: String,
    pub asin: String,
    pub title: String,
    pub price: String,
    /// Review score
    #[serde(default)]
    pub reviews: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Input for creating a `Wishlist` item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateWishlist {
    pub user_id: String,
    pub asin: String,
    pub title: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CreateWishlist {
    pub fn new(
        user_id: impl Into<String>,
        asin: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            asin: asin.into(),
            title: title.into(),
            price: price.into(),
            reviews: None,
            url: None,
        }
    }

    pub fn with_reviews(mut self, reviews: impl Into<String>) -> Self {
        self.reviews = Some(reviews.into());
        self
    }

    /// Fills `url` with the product page of `asin`
    pub fn with_product_url(mut self) -> Self {
        self.url = Some(product_url(&self.asin));
        self
    }
}

impl Model for Wishlist {
    const NAME: &'static str = WISHLIST;
    type Create = CreateWishlist;
}

/// Purchase history entry. Stored in the `Bookings` model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub order_id: String,
    pub item_type: String,
    pub title: String,
    pub price: String,
    /// ISO-8601
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub asin: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Booking {
    pub fn is_product(&self) -> bool {
        self.item_type == ITEM_TYPE_PRODUCT
    }
}

/// Input for creating a `Booking`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBooking {
    pub user_id: String,
    pub order_id: String,
    pub item_type: String,
    pub title: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CreateBooking {
    /// A product purchase, the only item type in use
    pub fn product(
        user_id: impl Into<String>,
        order_id: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            order_id: order_id.into(),
            item_type: ITEM_TYPE_PRODUCT.to_string(),
            title: title.into(),
            price: price.into(),
            purchase_date: None,
            asin: None,
            url: None,
        }
    }

    pub fn with_asin(mut self, asin: impl Into<String>) -> Self {
        self.asin = Some(asin.into());
        self
    }

    /// Sets `purchase_date` from a UTC timestamp (RFC 3339)
    pub fn purchased_at(mut self, at: chrono::DateTime<chrono::Utc>) -> Self {
        self.purchase_date = Some(at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
        self
    }

    /// Fills `url` with the product page of `asin`, if an asin is set
    pub fn with_product_url(mut self) -> Self {
        self.url = self.asin.as_deref().map(product_url);
        self
    }
}

impl Model for Booking {
    const NAME: &'static str = BOOKINGS;
    type Create = CreateBooking;
}
