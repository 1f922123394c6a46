//! # Reference Backend
//!
//! An in-memory implementation of the operations the hosting platform
//! generates for every declared model. It enforces the declared rules,
//! validates every write and maintains the secondary indexes, and serves
//! as the conformance harness for the declaration.
//!
//! ## Guarantees
//!
//! - Ids are generated, unique per model, and immutable
//! - A stored record always validates against its model
//! - Index queries return exactly the records whose field equals the key
//! - Deletes never cascade into other models

mod client;
mod errors;
mod filter;
mod memory;
mod page;

pub use client::DataClient;
pub use errors::{BackendError, BackendResult};
pub use filter::{FilterExpr, FilterOperator, FilterSet};
pub use memory::MemoryBackend;
pub use page::{ListOptions, Page, PageLimits, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
