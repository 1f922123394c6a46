//! Pagination for list and index queries
//!
//! Results come back in ascending id order. A `next_token` resumes after the
//! last id of the previous page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{BackendError, BackendResult};
use super::filter::FilterSet;

/// Default number of records per page
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: usize = 1000;

const TOKEN_PREFIX: &str = "after:";

/// Page size bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default: usize,
    pub max: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default: DEFAULT_PAGE_LIMIT,
            max: MAX_PAGE_LIMIT,
        }
    }
}

impl PageLimits {
    /// Resolves a requested limit against the bounds.
    pub fn resolve(&self, requested: Option<usize>) -> BackendResult<usize> {
        match requested {
            None => Ok(self.default),
            Some(limit) if limit == 0 || limit > self.max => Err(BackendError::InvalidLimit {
                limit,
                max: self.max,
            }),
            Some(limit) => Ok(limit),
        }
    }
}

/// Options for list and index queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// Page size; the backend default when None
    pub limit: Option<usize>,
    /// Token from a previous page
    pub next_token: Option<String>,
    /// Filters applied before pagination
    pub filter: FilterSet,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn after(mut self, next_token: impl Into<String>) -> Self {
        self.next_token = Some(next_token.into());
        self
    }

    pub fn filter(mut self, filter: FilterSet) -> Self {
        self.filter = filter;
        self
    }
}

/// One page of results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Value>,
    /// Present when more matching records follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

pub(crate) fn encode_token(last_id: &str) -> String {
    format!("{}{}", TOKEN_PREFIX, last_id)
}

pub(crate) fn decode_token(token: &str) -> BackendResult<String> {
    token
        .strip_prefix(TOKEN_PREFIX)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BackendError::InvalidNextToken(token.to_string()))
}

/// Collects one page from `(id, record)` pairs already in ascending id order.
///
/// Pairs at or before the token position must already be skipped.
pub(crate) fn paginate<'a, I>(records: I, filter: &FilterSet, limit: usize) -> Page
where
    I: Iterator<Item = (&'a String, &'a Value)>,
{
    let mut items = Vec::new();
    let mut last_id: Option<&String> = None;
    let mut more = false;

    for (id, record) in records.filter(|(_, record)| filter.matches(record)) {
        if items.len() == limit {
            more = true;
            break;
        }
        items.push(record.clone());
        last_id = Some(id);
    }

    Page {
        items,
        next_token: if more {
            last_id.map(|id| encode_token(id))
        } else {
            None
        },
    }
}
