//! Parameterized SELECT builder
//!
//! Predicates are written with `?` markers. Rendering walks the finished
//! statement once and hands every marker to a [`SqlDialect`], so arguments
//! always line up with their placeholders in predicate order.

use chrono::{DateTime, Utc};

use super::error::QueryError;
use super::{PostgresDialect, SqlDialect};

/// A value bound to one positional placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Int(i64),
    Text(String),
    Bool(bool),
    Time(DateTime<Utc>),
}

impl From<i64> for SqlArg {
    fn from(v: i64) -> Self {
        SqlArg::Int(v)
    }
}

impl From<bool> for SqlArg {
    fn from(v: bool) -> Self {
        SqlArg::Bool(v)
    }
}

impl From<String> for SqlArg {
    fn from(v: String) -> Self {
        SqlArg::Text(v)
    }
}

impl From<&str> for SqlArg {
    fn from(v: &str) -> Self {
        SqlArg::Text(v.to_string())
    }
}

impl From<&String> for SqlArg {
    fn from(v: &String) -> Self {
        SqlArg::Text(v.clone())
    }
}

impl From<DateTime<Utc>> for SqlArg {
    fn from(v: DateTime<Utc>) -> Self {
        SqlArg::Time(v)
    }
}

/// A single boolean condition with its bound arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    sql: String,
    args: Vec<SqlArg>,
}

impl Predicate {
    /// Raw SQL fragment. Use `?` for each argument and `??` for a literal `?`.
    pub fn raw(sql: impl Into<String>, args: Vec<SqlArg>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    fn compare(column: &str, op: &str, value: SqlArg) -> Self {
        Self {
            sql: format!("{} {} ?", column, op),
            args: vec![value],
        }
    }

    pub fn eq(column: &str, value: impl Into<SqlArg>) -> Self {
        Self::compare(column, "=", value.into())
    }

    pub fn not_eq(column: &str, value: impl Into<SqlArg>) -> Self {
        Self::compare(column, "<>", value.into())
    }

    pub fn gt(column: &str, value: impl Into<SqlArg>) -> Self {
        Self::compare(column, ">", value.into())
    }

    pub fn gte(column: &str, value: impl Into<SqlArg>) -> Self {
        Self::compare(column, ">=", value.into())
    }

    pub fn lt(column: &str, value: impl Into<SqlArg>) -> Self {
        Self::compare(column, "<", value.into())
    }

    pub fn lte(column: &str, value: impl Into<SqlArg>) -> Self {
        Self::compare(column, "<=", value.into())
    }

    pub fn like(column: &str, pattern: impl Into<SqlArg>) -> Self {
        Self::compare(column, "LIKE", pattern.into())
    }

    pub fn not_like(column: &str, pattern: impl Into<SqlArg>) -> Self {
        Self::compare(column, "NOT LIKE", pattern.into())
    }

    pub fn ilike(column: &str, pattern: impl Into<SqlArg>) -> Self {
        Self::compare(column, "ILIKE", pattern.into())
    }

    pub fn not_ilike(column: &str, pattern: impl Into<SqlArg>) -> Self {
        Self::compare(column, "NOT ILIKE", pattern.into())
    }

    /// Set membership. An empty set matches no rows.
    pub fn in_list<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlArg>,
    {
        Self::membership(column, "IN", "(1=0)", values)
    }

    /// Negated set membership. An empty set matches every row.
    pub fn not_in_list<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlArg>,
    {
        Self::membership(column, "NOT IN", "(1=1)", values)
    }

    fn membership<I, V>(column: &str, op: &str, empty: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlArg>,
    {
        let args: Vec<SqlArg> = values.into_iter().map(Into::into).collect();
        if args.is_empty() {
            return Self::raw(empty, Vec::new());
        }
        let markers = vec!["?"; args.len()].join(",");
        Self {
            sql: format!("{} {} ({})", column, op, markers),
            args,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[SqlArg] {
        &self.args
    }
}

/// Rendered statement: SQL text plus arguments in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

/// Accumulates the clauses of a single SELECT statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectBuilder {
    columns: Vec<String>,
    from: Option<String>,
    predicates: Vec<Predicate>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

/// Start a SELECT over the given result columns
pub fn select<I, S>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SelectBuilder {
        columns: columns.into_iter().map(Into::into).collect(),
        ..SelectBuilder::default()
    }
}

impl SelectBuilder {
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(table.into());
        self
    }

    /// Add a predicate, ANDed with every predicate added before it
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order_by(mut self, term: impl Into<String>) -> Self {
        self.order_by.push(term.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    /// Render with PostgreSQL `$N` placeholders
    pub fn to_sql(&self) -> Result<BuiltQuery, QueryError> {
        self.to_sql_with(&PostgresDialect)
    }

    pub fn to_sql_with(&self, dialect: &dyn SqlDialect) -> Result<BuiltQuery, QueryError> {
        if self.columns.is_empty() {
            return Err(QueryError::internal(
                "select statements must have at least one result column",
            ));
        }

        let Some(from) = &self.from else {
            return Err(QueryError::internal("select statements must name a table"));
        };

        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), from);

        let mut args = Vec::new();
        if !self.predicates.is_empty() {
            let clauses: Vec<&str> = self.predicates.iter().map(|p| p.sql.as_str()).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
            for p in &self.predicates {
                args.extend(p.args.iter().cloned());
            }
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        let (sql, markers) = replace_placeholders(&sql, dialect);
        if markers != args.len() {
            return Err(QueryError::internal(format!(
                "statement has {} placeholders but {} arguments",
                markers,
                args.len()
            )));
        }

        Ok(BuiltQuery { sql, args })
    }
}

/// Swap `?` markers for dialect placeholders. `??` renders a literal `?`.
fn replace_placeholders(sql: &str, dialect: &dyn SqlDialect) -> (String, usize) {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut count = 0;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '?' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'?') {
            chars.next();
            out.push('?');
            continue;
        }
        count += 1;
        out.push_str(&dialect.placeholder(count));
    }
    (out, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct QuestionMarkDialect;

    impl SqlDialect for QuestionMarkDialect {
        fn name(&self) -> &'static str {
            "question"
        }

        fn placeholder(&self, _index: usize) -> String {
            "?".to_string()
        }
    }

    #[test]
    fn test_select_without_clauses() {
        let built = select(["id", "email"]).from("users").to_sql().unwrap();
        assert_eq!(built.sql, "SELECT id, email FROM users");
        assert!(built.args.is_empty());
    }

    #[test]
    fn test_select_requires_columns() {
        let err = select(Vec::<String>::new()).from("users").to_sql().unwrap_err();
        assert!(matches!(err, QueryError::Internal(_)));
        assert!(err.to_string().contains("at least one result column"));
    }

    #[test]
    fn test_select_requires_table() {
        let err = select(["id"]).to_sql().unwrap_err();
        assert_eq!(
            err,
            QueryError::Internal("select statements must name a table".to_string())
        );
    }

    #[test]
    fn test_predicates_are_anded_and_numbered() {
        let built = select(["*"])
            .from("users")
            .and_where(Predicate::gt("id", 3i64))
            .and_where(Predicate::eq("email", "a@b.c"))
            .and_where(Predicate::eq("active", true))
            .to_sql()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT * FROM users WHERE id > $1 AND email = $2 AND active = $3"
        );
        assert_eq!(
            built.args,
            vec![
                SqlArg::Int(3),
                SqlArg::Text("a@b.c".to_string()),
                SqlArg::Bool(true)
            ]
        );
    }

    #[test]
    fn test_in_list_renders_one_placeholder_per_value() {
        let built = select(["id"])
            .from("t")
            .and_where(Predicate::in_list("id", [1i64, 2, 3]))
            .and_where(Predicate::not_in_list("name", ["x", "y"]))
            .to_sql()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT id FROM t WHERE id IN ($1,$2,$3) AND name NOT IN ($4,$5)"
        );
        assert_eq!(built.args.len(), 5);
    }

    #[test]
    fn test_empty_membership_sets() {
        let built = select(["id"])
            .from("t")
            .and_where(Predicate::in_list("id", Vec::<i64>::new()))
            .and_where(Predicate::not_in_list("id", Vec::<i64>::new()))
            .to_sql()
            .unwrap();
        assert_eq!(built.sql, "SELECT id FROM t WHERE (1=0) AND (1=1)");
        assert!(built.args.is_empty());
    }

    #[test]
    fn test_order_limit_offset() {
        let built = select(["id"])
            .from("t")
            .order_by("id DESC")
            .limit(25)
            .offset(5)
            .to_sql()
            .unwrap();
        assert_eq!(built.sql, "SELECT id FROM t ORDER BY id DESC LIMIT 25 OFFSET 5");
    }

    #[test]
    fn test_placeholder_argument_mismatch_is_internal() {
        let err = select(["id"])
            .from("t")
            .and_where(Predicate::raw("id = ? OR id = ?", vec![SqlArg::Int(1)]))
            .to_sql()
            .unwrap_err();
        assert!(matches!(err, QueryError::Internal(_)));
    }

    #[test]
    fn test_escaped_question_mark_is_literal() {
        let built = select(["id"])
            .from("t")
            .and_where(Predicate::raw("tags ?? 'a' AND id = ?", vec![SqlArg::Int(9)]))
            .to_sql()
            .unwrap();
        assert_eq!(built.sql, "SELECT id FROM t WHERE tags ? 'a' AND id = $1");
    }

    #[test]
    fn test_custom_dialect() {
        let built = select(["id"])
            .from("t")
            .and_where(Predicate::lte("id", 10i64))
            .to_sql_with(&QuestionMarkDialect)
            .unwrap();
        assert_eq!(built.sql, "SELECT id FROM t WHERE id <= ?");
    }
}
