//! Limit/offset pagination

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::builder::SelectBuilder;

/// Page size used when a request leaves the limit at zero
pub const DEFAULT_PAGE_LIMIT: u64 = 25;

/// `Limit > 0` caps the result, `0` uses [`DEFAULT_PAGE_LIMIT`] and a
/// negative limit returns every row. Offsets of zero or below are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct LimitOffsetPagination {
    pub limit: i64,
    pub offset: i64,
}

pub fn apply_pagination(mut q: SelectBuilder, page: &LimitOffsetPagination) -> SelectBuilder {
    match page.limit {
        n if n > 0 => q = q.limit(n as u64),
        0 => q = q.limit(DEFAULT_PAGE_LIMIT),
        _ => {}
    }
    if page.offset > 0 {
        q = q.offset(page.offset as u64);
    }
    q
}
