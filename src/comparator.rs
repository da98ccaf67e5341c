use std::cmp::Ordering;

use crate::column_type::ColumnType;
use crate::error::{SortError, SortResult};
use crate::locale::{Collator, Locale, Strength};
use crate::order::Order;
use crate::record::Record;
use crate::schema::Schema;
use crate::sort_key::SortKey;
use crate::value::Value;

/// Compares two non-null values of the same declared type
type ValueCompare = fn(&Value, &Value, &Collator) -> Ordering;

fn value_compare(column_type: ColumnType) -> ValueCompare {
    match column_type {
        ColumnType::String => { compare_strings }
        ColumnType::Number => { compare_numbers }
        ColumnType::Date => { compare_dates }
        ColumnType::Boolean => { compare_booleans }
    }
}

fn compare_strings(a: &Value, b: &Value, collator: &Collator) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => { collator.compare(a, b) }
        _ => { Ordering::Equal }
    }
}

fn compare_numbers(a: &Value, b: &Value, _collator: &Collator) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => { a.total_cmp(b) }
        _ => { Ordering::Equal }
    }
}

fn compare_dates(a: &Value, b: &Value, _collator: &Collator) -> Ordering {
    match (a, b) {
        (Value::Date(a), Value::Date(b)) => { a.cmp(b) }
        _ => { Ordering::Equal }
    }
}

fn compare_booleans(a: &Value, b: &Value, _collator: &Collator) -> Ordering {
    match (a, b) {
        (Value::Boolean(a), Value::Boolean(b)) => { a.cmp(b) }
        _ => { Ordering::Equal }
    }
}

struct KeyComparator {
    position: usize,
    column_type: ColumnType,
    compare: ValueCompare,
    collator: Collator,
    order: Order,
    nulls_first: bool,
}

impl KeyComparator {
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let left = Value::coerce(a.get(self.position), self.column_type);
        let right = Value::coerce(b.get(self.position), self.column_type);
        // nulls are placed on the ascending axis, a descending key flips them too
        let ascending = match (left.is_null(), right.is_null()) {
            (true, true) => { Ordering::Equal }
            (true, false) => {
                if self.nulls_first { Ordering::Less } else { Ordering::Greater }
            }
            (false, true) => {
                if self.nulls_first { Ordering::Greater } else { Ordering::Less }
            }
            (false, false) => { (self.compare)(&left, &right, &self.collator) }
        };
        match self.order {
            Order::Asc => { ascending }
            Order::Desc => { ascending.reverse() }
        }
    }
}

/// Total preorder over [Record]s built from an ordered list of [SortKey]s.
///
/// The first key decides; each following key only breaks ties left by the keys before it.
/// Column positions and per-type comparison functions are resolved once, when the comparator
/// is built. Values that cannot be coerced to the declared type compare as null.
pub struct RecordComparator {
    keys: Vec<KeyComparator>,
}

impl RecordComparator {
    pub fn new(schema: &Schema, keys: &[SortKey], locale: &Locale) -> SortResult<RecordComparator> {
        let mut comparators = Vec::with_capacity(keys.len());
        for key in keys {
            let position = schema.position(key.column())
                .ok_or_else(|| SortError::invalid_rule(format!("unknown column: {}", key.column())))?;
            let strength = if key.case_insensitive() {
                Strength::Primary
            } else {
                Strength::Tertiary
            };
            comparators.push(
                KeyComparator {
                    position,
                    column_type: key.column_type(),
                    compare: value_compare(key.column_type()),
                    collator: locale.collator(strength),
                    order: key.order(),
                    nulls_first: key.nulls_first(),
                }
            );
        }
        Ok(
            RecordComparator {
                keys: comparators,
            }
        )
    }

    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        self.keys.iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::column_type::ColumnType;
    use crate::comparator::RecordComparator;
    use crate::error::SortError;
    use crate::locale::Locale;
    use crate::order::Order;
    use crate::record::Record;
    use crate::schema::Schema;
    use crate::sort_key::SortKey;

    fn schema() -> Schema {
        Schema::new(vec!["name".to_string(), "age".to_string()]).unwrap()
    }

    fn row(name: Option<&str>, age: Option<&str>) -> Record {
        Record::new(vec![name.map(str::to_string), age.map(str::to_string)])
    }

    #[test]
    fn test_then_by() -> Result<(), anyhow::Error> {
        let keys = vec![
            SortKey::new("name", ColumnType::String).with_case_insensitive(true),
            SortKey::new("age", ColumnType::Number).with_order(Order::Desc),
        ];
        let comparator = RecordComparator::new(&schema(), &keys, &Locale::default())?;
        let mut rows = vec![
            row(Some("Bob"), Some("30")),
            row(Some("Ann"), Some("30")),
            row(Some("ann"), Some("25")),
        ];
        rows.sort_by(|a, b| comparator.compare(a, b));
        assert_eq!(rows, vec![
            row(Some("Ann"), Some("30")),
            row(Some("ann"), Some("25")),
            row(Some("Bob"), Some("30")),
        ]);
        Ok(())
    }

    #[test]
    fn test_number_comma_equals_point() -> Result<(), anyhow::Error> {
        let keys = vec![SortKey::new("age", ColumnType::Number)];
        let comparator = RecordComparator::new(&schema(), &keys, &Locale::default())?;
        assert_eq!(comparator.compare(&row(None, Some("1,5")), &row(None, Some("1.5"))), Ordering::Equal);
        assert_eq!(comparator.compare(&row(None, Some("9")), &row(None, Some("10"))), Ordering::Less);
        Ok(())
    }

    #[test]
    fn test_nulls_last_ascending_first_descending() -> Result<(), anyhow::Error> {
        let asc = RecordComparator::new(&schema(), &[SortKey::new("age", ColumnType::Number)], &Locale::default())?;
        let null = row(Some("x"), None);
        let unparsable = row(Some("x"), Some("n/a"));
        let value = row(Some("x"), Some("1"));
        assert_eq!(asc.compare(&null, &value), Ordering::Greater);
        assert_eq!(asc.compare(&unparsable, &value), Ordering::Greater);
        assert_eq!(asc.compare(&null, &unparsable), Ordering::Equal);

        let desc = RecordComparator::new(
            &schema(),
            &[SortKey::new("age", ColumnType::Number).with_order(Order::Desc)],
            &Locale::default(),
        )?;
        assert_eq!(desc.compare(&null, &value), Ordering::Less);
        Ok(())
    }

    #[test]
    fn test_nulls_first() -> Result<(), anyhow::Error> {
        let keys = vec![SortKey::new("age", ColumnType::Date).with_nulls_first(true)];
        let comparator = RecordComparator::new(&schema(), &keys, &Locale::default())?;
        assert_eq!(comparator.compare(&row(None, None), &row(None, Some("2024-01-01"))), Ordering::Less);
        Ok(())
    }

    #[test]
    fn test_boolean_false_before_true() -> Result<(), anyhow::Error> {
        let keys = vec![SortKey::new("age", ColumnType::Boolean)];
        let comparator = RecordComparator::new(&schema(), &keys, &Locale::default())?;
        assert_eq!(comparator.compare(&row(None, Some("no")), &row(None, Some("Y"))), Ordering::Less);
        Ok(())
    }

    #[test]
    fn test_unknown_column() {
        let keys = vec![SortKey::new("missing", ColumnType::String)];
        let result = RecordComparator::new(&schema(), &keys, &Locale::default());
        assert!(matches!(result, Err(SortError::InvalidRule { .. })));
    }

    #[test]
    fn test_no_keys_ties_everything() -> Result<(), anyhow::Error> {
        let comparator = RecordComparator::new(&schema(), &[], &Locale::default())?;
        assert!(comparator.is_empty());
        assert_eq!(comparator.compare(&row(Some("b"), None), &row(Some("a"), None)), Ordering::Equal);
        Ok(())
    }
}
