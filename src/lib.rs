//! concierge-data - the data layer of the shopping concierge
//!
//! Declares the three record models (UserProfile, Wishlist, Bookings), their
//! secondary indexes and the authenticated-only access rule, and provides the
//! tooling that checks, compiles and exercises that declaration.

pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod index;
pub mod observability;
pub mod records;
pub mod schema;
