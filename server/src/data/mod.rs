//! Data layer
//!
//! - `sql` - query builder: typed filters, sorting, pagination, `$N` rendering
//! - `postgres` - connection pool, schema and user repository
//! - `cache` - in-memory and Redis caching
//! - `types` - row and filter records shared by the layers above

pub mod cache;
pub mod postgres;
pub mod sql;
pub mod types;

pub use cache::CacheService;
pub use postgres::PostgresService;
