//! SQL dialect trait
//!
//! The builder writes `?` markers and the dialect decides how each
//! positional parameter is spelled in the final statement.

pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;
}
