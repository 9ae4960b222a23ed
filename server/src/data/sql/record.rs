//! Record shapes and structural filters
//!
//! A record describes its own fields through [`Shaped`]: the field name, an
//! optional column override, the filter kind it carries, and whether it is
//! excluded from column mapping. Filter records are declared with
//! [`filter_record!`](crate::filter_record), which writes the struct and its
//! registration together so every declared field is interpreted by
//! [`apply_struct_filter`].

use super::builder::SelectBuilder;
use super::error::QueryError;
use super::filters::{
    BoolFilter, IntFilter, StringFilter, TimeFilter, apply_bool_filter, apply_int_filter,
    apply_string_filter, apply_time_filter,
};

/// Value kind of a registered field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    String,
    Bool,
    Time,
}

/// Static description of one record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub column: Option<&'static str>,
    pub kind: FieldKind,
    pub excluded: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column: None,
            kind,
            excluded: false,
        }
    }

    /// Map the field to an explicit column name
    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    /// Leave the field out of column lists and mappings
    pub const fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Column override if present, else the lowercased field name
    pub fn column_name(&self) -> String {
        match self.column {
            Some(column) => column.to_string(),
            None => self.name.to_lowercase(),
        }
    }
}

/// Shape of a type as seen by the column mapper and filter composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Record(&'static [FieldSpec]),
    Scalar(&'static str),
}

pub trait Shaped {
    fn shape() -> Shape;
}

/// Borrowed view of one filter value
#[derive(Debug, Clone, Copy)]
pub enum FilterRef<'a> {
    Int(&'a IntFilter),
    String(&'a StringFilter),
    Bool(&'a BoolFilter),
    Time(&'a TimeFilter),
}

impl FilterRef<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FilterRef::Int(_) => FieldKind::Int,
            FilterRef::String(_) => FieldKind::String,
            FilterRef::Bool(_) => FieldKind::Bool,
            FilterRef::Time(_) => FieldKind::Time,
        }
    }
}

/// Implemented by the four filter types so records can register them
pub trait FilterValue {
    const KIND: FieldKind;

    fn filter_ref(&self) -> FilterRef<'_>;
}

impl FilterValue for IntFilter {
    const KIND: FieldKind = FieldKind::Int;

    fn filter_ref(&self) -> FilterRef<'_> {
        FilterRef::Int(self)
    }
}

impl FilterValue for StringFilter {
    const KIND: FieldKind = FieldKind::String;

    fn filter_ref(&self) -> FilterRef<'_> {
        FilterRef::String(self)
    }
}

impl FilterValue for BoolFilter {
    const KIND: FieldKind = FieldKind::Bool;

    fn filter_ref(&self) -> FilterRef<'_> {
        FilterRef::Bool(self)
    }
}

impl FilterValue for TimeFilter {
    const KIND: FieldKind = FieldKind::Time;

    fn filter_ref(&self) -> FilterRef<'_> {
        FilterRef::Time(self)
    }
}

/// A record whose fields can be read back as filters by name
pub trait FilterRecord: Shaped {
    /// The filter stored in `field`, or `None` when it is unset
    fn field_filter(&self, field: &str) -> Option<FilterRef<'_>>;
}

macro_rules! scalar_shape {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Shaped for $ty {
                fn shape() -> Shape {
                    Shape::Scalar($name)
                }
            }

            impl FilterRecord for $ty {
                fn field_filter(&self, _field: &str) -> Option<FilterRef<'_>> {
                    None
                }
            }
        )*
    };
}

scalar_shape!(String => "String", i64 => "i64", bool => "bool");

/// Declare a filter record together with its field registration.
///
/// Every field is stored as `Option<FilterType>`. A field may name its
/// column with `=> "column"`; otherwise the lowercased field name is used.
///
/// ```
/// use userbase_server::data::sql::{IntFilter, StringFilter};
///
/// userbase_server::filter_record! {
///     #[derive(Debug, Default)]
///     pub struct OrderFilter {
///         pub id: IntFilter,
///         pub customer_name: StringFilter => "customer",
///     }
/// }
///
/// let filter = OrderFilter::default();
/// assert!(filter.id.is_none());
/// ```
#[macro_export]
macro_rules! filter_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $column:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: Option<$ty>,
            )*
        }

        impl $crate::data::sql::Shaped for $name {
            fn shape() -> $crate::data::sql::Shape {
                const FIELDS: &[$crate::data::sql::FieldSpec] = &[
                    $(
                        $crate::data::sql::FieldSpec::new(
                            stringify!($field),
                            <$ty as $crate::data::sql::FilterValue>::KIND,
                        )
                        $(.column($column))?,
                    )*
                ];
                $crate::data::sql::Shape::Record(FIELDS)
            }
        }

        impl $crate::data::sql::FilterRecord for $name {
            fn field_filter(&self, field: &str) -> Option<$crate::data::sql::FilterRef<'_>> {
                match field {
                    $(
                        stringify!($field) => self
                            .$field
                            .as_ref()
                            .map($crate::data::sql::FilterValue::filter_ref),
                    )*
                    _ => None,
                }
            }
        }
    };
}

/// Add the predicates of every set field in `record`, ANDed in field order.
///
/// Columns are `column_prefix` followed by the field's column name, so a
/// prefix such as `"u."` targets a joined table. Scalars are rejected with an
/// internal error, as is a field whose value disagrees with its registered
/// kind.
pub fn apply_struct_filter<R: FilterRecord>(
    mut q: SelectBuilder,
    column_prefix: &str,
    record: &R,
) -> Result<SelectBuilder, QueryError> {
    let fields = match R::shape() {
        Shape::Record(fields) => fields,
        Shape::Scalar(name) => {
            return Err(QueryError::internal(format!(
                "failed to use filter as it is not a struct ({})",
                name
            )));
        }
    };

    for field in fields.iter().filter(|f| !f.excluded) {
        let Some(filter) = record.field_filter(field.name) else {
            continue;
        };
        if filter.kind() != field.kind {
            return Err(QueryError::internal(format!(
                "filter field {} is registered as {:?} but holds a {:?} filter",
                field.name,
                field.kind,
                filter.kind()
            )));
        }

        let column = format!("{}{}", column_prefix, field.column_name());
        q = match filter {
            FilterRef::Int(f) => apply_int_filter(q, &column, f),
            FilterRef::String(f) => apply_string_filter(q, &column, f),
            FilterRef::Bool(f) => apply_bool_filter(q, &column, f),
            FilterRef::Time(f) => apply_time_filter(q, &column, f),
        };
    }

    Ok(q)
}
