use crate::error::{SortError, SortResult};

/// Ordered, unique column names read from the header line.
///
/// Column order is reused when records are written back to text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> SortResult<Schema> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(SortError::parse_failure("header", format!("duplicate column name: {column}")));
            }
        }
        Ok(Schema { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of `column` in the header, if present
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}
