//! Single column sorting checked against a column mapping

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::builder::SelectBuilder;
use super::columns::ColumnMapping;
use super::error::QueryError;

/// Column used when a sort names no column
pub const DEFAULT_SORT_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only `desc` (any case, surrounding whitespace ignored) sorts descending
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Requested column and direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct OneColumnSort {
    pub column: String,
    pub order: String,
}

/// Append `ORDER BY <column> <ASC|DESC>`.
///
/// The column goes through `mapping`; anything it cannot resolve fails with
/// an unprocessable error so no caller text reaches the statement.
pub fn apply_sort(
    q: SelectBuilder,
    sort: &OneColumnSort,
    mapping: &ColumnMapping,
) -> Result<SelectBuilder, QueryError> {
    let requested = match sort.column.trim() {
        "" => DEFAULT_SORT_COLUMN,
        column => column,
    };

    let column = mapping.resolve(requested).ok_or_else(|| {
        QueryError::unprocessable(format!("can't sort by column {}", requested))
    })?;
    let order = SortOrder::parse(&sort.order);

    Ok(q.order_by(format!("{} {}", column, order.as_sql())))
}
