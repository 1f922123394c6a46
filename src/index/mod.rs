//! Secondary index subsystem
//!
//! Indexes are derived, in-memory state kept alongside each model's records.
//!
//! # Invariants
//!
//! - Updates occur AFTER the record is stored
//! - Lookup returns ids sorted ascending
//! - Only fields the model declares an index for can be queried

mod btree;
mod errors;
mod manager;

pub use btree::IndexTree;
pub use errors::{IndexError, IndexResult};
pub use manager::IndexManager;
