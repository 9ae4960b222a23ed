//! Binding rendered query arguments onto sqlx queries

use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;

use crate::data::sql::SqlArg;

/// Bind `args` in placeholder order
pub fn bind_args<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    args: &'q [SqlArg],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for arg in args {
        query = match arg {
            SqlArg::Int(v) => query.bind(*v),
            SqlArg::Text(v) => query.bind(v.as_str()),
            SqlArg::Bool(v) => query.bind(*v),
            SqlArg::Time(v) => query.bind(*v),
        };
    }
    query
}
