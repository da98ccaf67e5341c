use crate::schema::Schema;

/// One row, holding the original text of each field in schema order.
///
/// A value is `None` when the row has no field for the column. Fields beyond the schema are
/// kept after the schema columns so that the row is written back whole. Coercion to a typed
/// [Value](crate::value::Value) happens only when a comparator asks for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    values: Vec<Option<String>>,
}

impl Record {
    pub fn new(values: Vec<Option<String>>) -> Record {
        Record {
            values,
        }
    }

    /// Build a record from parsed fields, padding missing trailing fields with nulls.
    pub fn from_fields<'a, I>(schema: &Schema, fields: I) -> Record
        where I: IntoIterator<Item=&'a str> {
        let mut values: Vec<Option<String>> = fields.into_iter()
            .map(|field| Some(field.to_string()))
            .collect();
        if values.len() < schema.len() {
            values.resize(schema.len(), None);
        }
        Record {
            values,
        }
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.values.get(position).and_then(|value| value.as_deref())
    }

    /// Value of the named column
    pub fn value(&self, schema: &Schema, column: &str) -> Option<&str> {
        schema.position(column).and_then(|position| self.get(position))
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use crate::record::Record;
    use crate::schema::Schema;

    #[test]
    fn test_from_fields_pads_and_keeps_extra_fields() -> Result<(), anyhow::Error> {
        let schema = Schema::new(vec!["a".to_string(), "b".to_string(), "c".to_string()])?;
        let short = Record::from_fields(&schema, vec!["1"]);
        assert_eq!(short.get(0), Some("1"));
        assert_eq!(short.get(1), None);
        assert_eq!(short.value(&schema, "c"), None);

        let long = Record::from_fields(&schema, vec!["1", "2", "3", "4"]);
        assert_eq!(long.values().len(), 4);
        assert_eq!(long.value(&schema, "c"), Some("3"));
        assert_eq!(long.get(3), Some("4"));
        Ok(())
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        assert!(Schema::new(vec!["a".to_string(), "a".to_string()]).is_err());
    }
}
