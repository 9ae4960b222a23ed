//! User record and list parameters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data::sql::{
    FieldKind, FieldSpec, IntFilter, LimitOffsetPagination, OneColumnSort, Shape, Shaped,
    StringFilter, TimeFilter,
};

/// Columns read back for every user query, in `UserRow` field order
pub const USER_COLUMNS: [&str; 8] = [
    "id",
    "email",
    "password",
    "description",
    "firstname",
    "lastname",
    "created_at",
    "updated_at",
];

/// User row from database
///
/// `password` holds the argon2 PHC string, never the plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub description: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tuple shape returned by `sqlx::query_as` for [`USER_COLUMNS`]
pub type UserTuple = (
    i64,
    String,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

impl From<UserTuple> for UserRow {
    fn from(
        (id, email, password, description, first_name, last_name, created_at, updated_at): UserTuple,
    ) -> Self {
        Self {
            id,
            email,
            password,
            description,
            first_name,
            last_name,
            created_at,
            updated_at,
        }
    }
}

impl Shaped for UserRow {
    fn shape() -> Shape {
        // password stays out of the sort safe list
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::new("ID", FieldKind::Int),
            FieldSpec::new("Email", FieldKind::String),
            FieldSpec::new("Password", FieldKind::String).excluded(),
            FieldSpec::new("Description", FieldKind::String),
            FieldSpec::new("FirstName", FieldKind::String),
            FieldSpec::new("LastName", FieldKind::String),
            FieldSpec::new("CreatedAt", FieldKind::Time).column("created_at"),
            FieldSpec::new("UpdatedAt", FieldKind::Time).column("updated_at"),
        ];
        Shape::Record(FIELDS)
    }
}

crate::filter_record! {
    /// Per column constraints for listing users
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
    #[serde(rename_all = "PascalCase", deny_unknown_fields)]
    pub struct UserFilter {
        #[serde(rename = "ID")]
        pub id: IntFilter,
        pub email: StringFilter,
        pub first_name: StringFilter => "firstname",
        pub last_name: StringFilter => "lastname",
        pub description: StringFilter,
        pub created_at: TimeFilter => "created_at",
        pub updated_at: TimeFilter => "updated_at",
    }
}

/// Filter, sort and page for a user listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserListParams {
    pub filter: UserFilter,
    pub sort: OneColumnSort,
    pub pagination: LimitOffsetPagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sql::{column_mapping, columns};

    #[test]
    fn test_user_columns_match_shape() {
        let mut expected: Vec<String> = USER_COLUMNS.iter().map(|c| c.to_string()).collect();
        expected.retain(|c| c != "password");
        assert_eq!(columns::<UserRow>().unwrap(), expected);
    }

    #[test]
    fn test_user_mapping_accepts_field_and_column_names() {
        let mapping = column_mapping::<UserRow>().unwrap();
        assert_eq!(mapping.resolve("FirstName"), Some("firstname"));
        assert_eq!(mapping.resolve("firstname"), Some("firstname"));
        assert_eq!(mapping.resolve("CreatedAt"), Some("created_at"));
        assert_eq!(mapping.resolve("created_at"), Some("created_at"));
        assert_eq!(mapping.resolve("Password"), None);
    }

    #[test]
    fn test_user_filter_columns() {
        let Shape::Record(fields) = UserFilter::shape() else {
            panic!("expected record shape");
        };
        let cols: Vec<String> = fields.iter().map(FieldSpec::column_name).collect();
        assert_eq!(
            cols,
            vec![
                "id",
                "email",
                "firstname",
                "lastname",
                "description",
                "created_at",
                "updated_at"
            ]
        );
    }

    #[test]
    fn test_list_params_from_json() {
        let params: UserListParams = serde_json::from_str(
            r#"{
                "Filter": {"ID": {"Gt": 3}, "FirstName": {"Contains": "an"}},
                "Sort": {"Column": "LastName", "Order": "desc"},
                "Pagination": {"Limit": 10}
            }"#,
        )
        .unwrap();
        assert_eq!(params.filter.id.as_ref().and_then(|f| f.gt), Some(3));
        assert_eq!(
            params.filter.first_name.as_ref().and_then(|f| f.contains.as_deref()),
            Some("an")
        );
        assert_eq!(params.sort.order, "desc");
        assert_eq!(params.pagination.limit, 10);
        assert_eq!(params.pagination.offset, 0);
    }

    #[test]
    fn test_list_params_reject_misspelled_filter() {
        let misspelled_field =
            serde_json::from_str::<UserListParams>(r#"{"Filter": {"Frist_Name": {"Is": "x"}}}"#);
        assert!(misspelled_field.unwrap_err().to_string().contains("Frist_Name"));

        let misspelled_operator =
            serde_json::from_str::<UserListParams>(r#"{"Filter": {"ID": {"GT": 5}}}"#);
        assert!(misspelled_operator.unwrap_err().to_string().contains("GT"));
    }

    #[test]
    fn test_list_params_default_when_empty() {
        let params: UserListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, UserListParams::default());
    }
}
