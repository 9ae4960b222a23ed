//! SQL query building
//!
//! Pure, synchronous construction of parameterized `SELECT` statements:
//! typed column filters, structural filter records, a sort checked against
//! a column safe list, and limit/offset pagination. Nothing here touches a
//! connection or shared state; callers execute the rendered [`BuiltQuery`].

mod builder;
mod columns;
mod dialect;
mod error;
mod filters;
mod pagination;
mod postgres_dialect;
mod record;
mod sort;

pub use builder::{BuiltQuery, Predicate, SelectBuilder, SqlArg, select};
pub use columns::{ColumnMapping, column_aliases, column_mapping, columns, concat_select_columns};
pub use dialect::SqlDialect;
pub use error::QueryError;
pub use filters::{
    BoolFilter, IntFilter, StringFilter, TimeFilter, apply_bool_filter, apply_int_filter,
    apply_string_filter, apply_time_filter,
};
pub use pagination::{DEFAULT_PAGE_LIMIT, LimitOffsetPagination, apply_pagination};
pub use postgres_dialect::PostgresDialect;
pub use record::{
    FieldKind, FieldSpec, FilterRecord, FilterRef, FilterValue, Shape, Shaped, apply_struct_filter,
};
pub use sort::{DEFAULT_SORT_COLUMN, OneColumnSort, SortOrder, apply_sort};
