use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::SortError;

/// Declared type of a column, selecting how its text values are coerced for comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Text compared with locale collation
    String,
    /// Decimal number, a comma is accepted as the decimal separator
    Number,
    /// Calendar date, ISO-8601, dd/mm/yyyy or mm/dd/yyyy
    Date,
    /// true/false and equivalents
    Boolean,
}

impl FromStr for ColumnType {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Ok(ColumnType::String),
            "number" | "numeric" => Ok(ColumnType::Number),
            "date" => Ok(ColumnType::Date),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            other => Err(SortError::invalid_rule(format!("unsupported column type: {other}"))),
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnType::String => { "STRING" }
            ColumnType::Number => { "NUMBER" }
            ColumnType::Date => { "DATE" }
            ColumnType::Boolean => { "BOOLEAN" }
        };
        write!(f, "{name}")
    }
}
