//! Column mapping for shaped records

use std::collections::HashMap;

use super::error::QueryError;
use super::record::{FieldSpec, Shape, Shaped};

fn record_fields<T: Shaped>() -> Result<impl Iterator<Item = &'static FieldSpec>, QueryError> {
    match T::shape() {
        Shape::Record(fields) => Ok(fields.iter().filter(|f| !f.excluded)),
        Shape::Scalar(name) => Err(QueryError::internal(format!(
            "failed to get columns as it is not a struct ({})",
            name
        ))),
    }
}

/// Column names of `T` in field declaration order
pub fn columns<T: Shaped>() -> Result<Vec<String>, QueryError> {
    Ok(record_fields::<T>()?.map(FieldSpec::column_name).collect())
}

/// Aliased select expressions, `prefix + column "prefix + column"`, for
/// reading the columns of a joined table back under distinct names
pub fn column_aliases<T: Shaped>(prefix: &str) -> Result<Vec<String>, QueryError> {
    Ok(record_fields::<T>()?
        .map(|f| {
            let column = f.column_name();
            format!("{}{} \"{}{}\"", prefix, column, prefix, column)
        })
        .collect())
}

/// Join a raw column list with any number of generated column lists
pub fn concat_select_columns(columns: &str, column_lists: &[Vec<String>]) -> String {
    let mut all: Vec<&str> = Vec::new();
    if !columns.is_empty() {
        all.push(columns);
    }
    for list in column_lists {
        all.extend(list.iter().map(String::as_str));
    }
    all.join(",\n")
}

/// Safe list of column names reachable from caller supplied identifiers.
///
/// Both the field name and the column name of every mapped field resolve to
/// the column. Lookups ignore case and underscores, so `FirstName`,
/// `first_name` and `firstname` are the same key. Two columns that normalize
/// to the same key cannot share a mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    entries: HashMap<String, String>,
}

impl ColumnMapping {
    /// Map `key` to `column`, failing if the normalized key already
    /// names a different column
    pub fn insert(&mut self, key: &str, column: &str) -> Result<(), QueryError> {
        let normalized = lookup_key(key);
        match self.entries.get(&normalized) {
            Some(existing) if existing != column => Err(QueryError::internal(format!(
                "column key {} is ambiguous between {} and {}",
                key, existing, column
            ))),
            Some(_) => Ok(()),
            None => {
                self.entries.insert(normalized, column.to_string());
                Ok(())
            }
        }
    }

    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.entries.get(&lookup_key(key)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lookup_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Build the column mapping of `T`
pub fn column_mapping<T: Shaped>() -> Result<ColumnMapping, QueryError> {
    let mut mapping = ColumnMapping::default();
    for field in record_fields::<T>()? {
        let column = field.column_name();
        mapping.insert(&column, &column)?;
        mapping.insert(field.name, &column)?;
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sql::record::FieldKind;

    struct TestRow;

    impl Shaped for TestRow {
        fn shape() -> Shape {
            const FIELDS: &[FieldSpec] = &[
                FieldSpec::new("id", FieldKind::Int),
                FieldSpec::new("TestCase", FieldKind::String).column("test_case"),
                FieldSpec::new("IntColumn", FieldKind::Int).column("int_column"),
                FieldSpec::new("Secret", FieldKind::String).excluded(),
                FieldSpec::new("CreatedAt", FieldKind::Time),
            ];
            Shape::Record(FIELDS)
        }
    }

    #[test]
    fn test_columns_in_order_without_excluded() {
        assert_eq!(
            columns::<TestRow>().unwrap(),
            vec!["id", "test_case", "int_column", "createdat"]
        );
    }

    #[test]
    fn test_columns_of_scalar_is_internal() {
        let err = columns::<String>().unwrap_err();
        assert!(matches!(err, QueryError::Internal(_)));
        assert!(column_mapping::<i64>().is_err());
    }

    #[test]
    fn test_mapping_resolves_field_and_column_names() {
        let mapping = column_mapping::<TestRow>().unwrap();
        assert_eq!(mapping.resolve("IntColumn"), Some("int_column"));
        assert_eq!(mapping.resolve("int_column"), Some("int_column"));
        assert_eq!(mapping.resolve("intcolumn"), Some("int_column"));
        assert_eq!(mapping.resolve("TestCase"), Some("test_case"));
        assert_eq!(mapping.resolve("ID"), Some("id"));
        assert_eq!(mapping.resolve("CreatedAt"), Some("createdat"));
    }

    #[test]
    fn test_mapping_skips_excluded_fields() {
        let mapping = column_mapping::<TestRow>().unwrap();
        assert_eq!(mapping.resolve("Secret"), None);
        assert_eq!(mapping.resolve("not_allowed"), None);
    }

    struct AmbiguousRow;

    impl Shaped for AmbiguousRow {
        fn shape() -> Shape {
            const FIELDS: &[FieldSpec] = &[
                FieldSpec::new("ab", FieldKind::Int),
                FieldSpec::new("a_b", FieldKind::Int),
            ];
            Shape::Record(FIELDS)
        }
    }

    #[test]
    fn test_mapping_rejects_colliding_columns() {
        assert_eq!(columns::<AmbiguousRow>().unwrap(), vec!["ab", "a_b"]);
        let err = column_mapping::<AmbiguousRow>().unwrap_err();
        assert!(matches!(err, QueryError::Internal(ref m) if m.contains("ambiguous")));
    }

    #[test]
    fn test_insert_same_column_twice_is_ok() {
        let mut mapping = ColumnMapping::default();
        mapping.insert("first_name", "first_name").unwrap();
        mapping.insert("FirstName", "first_name").unwrap();
        assert_eq!(mapping.len(), 1);
        assert!(mapping.insert("firstname", "firstname").is_err());
        assert_eq!(mapping.resolve("FIRSTNAME"), Some("first_name"));
    }

    #[test]
    fn test_column_aliases() {
        let aliases = column_aliases::<TestRow>("t.").unwrap();
        assert_eq!(aliases[0], "t.id \"t.id\"");
        assert_eq!(aliases[2], "t.int_column \"t.int_column\"");
        assert_eq!(aliases.len(), 4);
    }

    #[test]
    fn test_concat_select_columns() {
        let joined = concat_select_columns(
            "count(*)",
            &[vec!["a".to_string()], vec!["b".to_string(), "c".to_string()]],
        );
        assert_eq!(joined, "count(*),\na,\nb,\nc");
        assert_eq!(concat_select_columns("", &[vec!["a".to_string()]]), "a");
    }
}
