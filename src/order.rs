use std::str::FromStr;

use crate::error::SortError;

/// Sort direction of a single key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Order {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl FromStr for Order {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Order::Asc),
            "desc" | "descending" => Ok(Order::Desc),
            other => Err(SortError::invalid_rule(format!("unsupported sort order: {other}"))),
        }
    }
}
