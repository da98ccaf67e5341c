use crate::column_type::ColumnType;
use crate::order::Order;

/// Defines one level of a multi-key ordering.
///
/// The first key of a key list dominates; ties cascade to the next key.
///
/// # Examples
/// ```
/// // order by the name column ignoring case, then by age descending
/// use tabular_file_sort::column_type::ColumnType;
/// use tabular_file_sort::order::Order;
/// use tabular_file_sort::sort_key::SortKey;
/// let keys = vec![
///     SortKey::new("name", ColumnType::String).with_case_insensitive(true),
///     SortKey::new("age", ColumnType::Number).with_order(Order::Desc),
/// ];
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SortKey {
    column: String,
    column_type: ColumnType,
    order: Order,
    case_insensitive: bool,
    nulls_first: bool,
}

impl SortKey {
    /// Create a new ascending, case sensitive [SortKey] with nulls sorting last
    ///
    /// # Arguments
    /// * `column` - the column name as it appears in the header
    /// * `column_type` - the type values are coerced to for comparison. See [ColumnType]
    pub fn new(column: &str, column_type: ColumnType) -> SortKey {
        SortKey {
            column: column.to_string(),
            column_type,
            order: Order::Asc,
            case_insensitive: false,
            nulls_first: false,
        }
    }

    /// Get the column name for this key.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Get the [ColumnType] for this key.
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Get the [Order] for this key.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Get the case insensitive setting for this key.
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Get the nulls first setting for this key.
    pub fn nulls_first(&self) -> bool {
        self.nulls_first
    }

    /// Specify the [Order] for this key. The default is [Order::Asc]
    pub fn with_order(mut self, order: Order) -> SortKey {
        self.order = order;
        self
    }

    /// Specify the column type for this key.
    pub fn with_column_type(mut self, column_type: ColumnType) -> SortKey {
        self.column_type = column_type;
        self
    }

    /// Specify whether String comparison ignores case and accents.
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> SortKey {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Specify whether null values come before non-null values in ascending order.
    ///
    /// Null placement is fixed relative to the ascending axis: a descending key reverses it
    /// together with the values, so with the default of `false` nulls come last in ascending
    /// order and first in descending order.
    pub fn with_nulls_first(mut self, nulls_first: bool) -> SortKey {
        self.nulls_first = nulls_first;
        self
    }
}
