//! Typed column filters
//!
//! Each filter is a bag of optional operators. Every operator that is set
//! adds one predicate to the query; all of them are ANDed, so `Gt` and `Lt`
//! together describe an open interval. A filter with nothing set leaves the
//! query untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::builder::{Predicate, SelectBuilder};

/// Filter criteria for an integer column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct IntFilter {
    pub is: Option<i64>,
    pub not: Option<i64>,
    #[serde(rename = "In")]
    pub is_in: Option<Vec<i64>>,
    pub not_in: Option<Vec<i64>>,
    pub gt: Option<i64>,
    pub gte: Option<i64>,
    pub lt: Option<i64>,
    pub lte: Option<i64>,
}

/// Filter criteria for a text column
///
/// Equality and membership compare exact values. `Contains` is case
/// insensitive, `StartsWith` and `EndsWith` are case sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct StringFilter {
    pub is: Option<String>,
    pub not: Option<String>,
    #[serde(rename = "In")]
    pub is_in: Option<Vec<String>>,
    pub not_in: Option<Vec<String>>,
    pub contains: Option<String>,
    pub not_contains: Option<String>,
    pub starts_with: Option<String>,
    pub not_starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub not_ends_with: Option<String>,
}

/// Filter criteria for a boolean column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct BoolFilter {
    pub is: Option<bool>,
}

/// Filter criteria for a timestamp column (both bounds exclusive)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct TimeFilter {
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
}

pub fn apply_int_filter(mut q: SelectBuilder, column: &str, filter: &IntFilter) -> SelectBuilder {
    if let Some(v) = filter.is {
        q = q.and_where(Predicate::eq(column, v));
    }
    if let Some(v) = filter.not {
        q = q.and_where(Predicate::not_eq(column, v));
    }
    if let Some(values) = &filter.is_in {
        q = q.and_where(Predicate::in_list(column, values.iter().copied()));
    }
    if let Some(values) = &filter.not_in {
        q = q.and_where(Predicate::not_in_list(column, values.iter().copied()));
    }
    if let Some(v) = filter.gt {
        q = q.and_where(Predicate::gt(column, v));
    }
    if let Some(v) = filter.gte {
        q = q.and_where(Predicate::gte(column, v));
    }
    if let Some(v) = filter.lt {
        q = q.and_where(Predicate::lt(column, v));
    }
    if let Some(v) = filter.lte {
        q = q.and_where(Predicate::lte(column, v));
    }
    q
}

pub fn apply_string_filter(
    mut q: SelectBuilder,
    column: &str,
    filter: &StringFilter,
) -> SelectBuilder {
    if let Some(v) = &filter.is {
        q = q.and_where(Predicate::eq(column, v));
    }
    if let Some(v) = &filter.not {
        q = q.and_where(Predicate::not_eq(column, v));
    }
    if let Some(values) = &filter.is_in {
        q = q.and_where(Predicate::in_list(column, values));
    }
    if let Some(values) = &filter.not_in {
        q = q.and_where(Predicate::not_in_list(column, values));
    }
    if let Some(v) = &filter.contains {
        q = q.and_where(Predicate::ilike(column, format!("%{}%", escape_like(v))));
    }
    if let Some(v) = &filter.not_contains {
        q = q.and_where(Predicate::not_ilike(column, format!("%{}%", escape_like(v))));
    }
    if let Some(v) = &filter.starts_with {
        q = q.and_where(Predicate::like(column, format!("{}%", escape_like(v))));
    }
    if let Some(v) = &filter.not_starts_with {
        q = q.and_where(Predicate::not_like(column, format!("{}%", escape_like(v))));
    }
    if let Some(v) = &filter.ends_with {
        q = q.and_where(Predicate::like(column, format!("%{}", escape_like(v))));
    }
    if let Some(v) = &filter.not_ends_with {
        q = q.and_where(Predicate::not_like(column, format!("%{}", escape_like(v))));
    }
    q
}

pub fn apply_bool_filter(q: SelectBuilder, column: &str, filter: &BoolFilter) -> SelectBuilder {
    match filter.is {
        Some(v) => q.and_where(Predicate::eq(column, v)),
        None => q,
    }
}

pub fn apply_time_filter(mut q: SelectBuilder, column: &str, filter: &TimeFilter) -> SelectBuilder {
    if let Some(before) = filter.before {
        q = q.and_where(Predicate::lt(column, before));
    }
    if let Some(after) = filter.after {
        q = q.and_where(Predicate::gt(column, after));
    }
    q
}

/// Escape LIKE metacharacters (%, _, \) so user text matches literally
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
