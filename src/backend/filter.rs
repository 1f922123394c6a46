//! # Filter Expressions
//!
//! Filters applied to list and index-query results. All declared fields are
//! strings, so the operators are string operators.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Equals
    Eq,
    /// Not equals (absent fields match)
    Ne,
    /// String prefix
    BeginsWith,
    /// Substring
    Contains,
    /// Field present and non-null (`true`) or absent/null (`false`)
    Exists,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::BeginsWith => "begins_with",
            FilterOperator::Contains => "contains",
            FilterOperator::Exists => "exists",
        }
    }
}

/// A filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: String,
    /// Comparison operator
    pub operator: FilterOperator,
    /// Value to compare against
    pub value: Value,
}

impl FilterExpr {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Eq, Value::String(value.into()))
    }

    pub fn ne(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Ne, Value::String(value.into()))
    }

    pub fn begins_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::BeginsWith, Value::String(prefix.into()))
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Contains, Value::String(needle.into()))
    }

    pub fn exists(field: impl Into<String>, present: bool) -> Self {
        Self::new(field, FilterOperator::Exists, Value::Bool(present))
    }

    /// Check if a record matches this filter
    pub fn matches(&self, record: &Value) -> bool {
        let field_value = record.get(&self.field).filter(|v| !v.is_null());

        match self.operator {
            FilterOperator::Exists => {
                let want = self.value.as_bool().unwrap_or(true);
                field_value.is_some() == want
            }
            FilterOperator::Eq => field_value == Some(&self.value),
            FilterOperator::Ne => field_value != Some(&self.value),
            FilterOperator::BeginsWith => match (field_value.and_then(Value::as_str), self.value.as_str()) {
                (Some(s), Some(prefix)) => s.starts_with(prefix),
                _ => false,
            },
            FilterOperator::Contains => match (field_value.and_then(Value::as_str), self.value.as_str()) {
                (Some(s), Some(needle)) => s.contains(needle),
                _ => false,
            },
        }
    }
}

/// A set of filters combined with AND logic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Check if a record matches all filters
    pub fn matches(&self, record: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}
