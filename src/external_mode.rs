use std::str::FromStr;

use crate::error::SortError;

/// Out of core strategy used by [Sort::sort](crate::sort::Sort::sort)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExternalMode {
    /// Sort a 12 byte per line offset index and stream the original line bytes in the new
    /// order. Lines are copied byte for byte.
    #[default]
    Index,
    /// Sort bounded chunks of rows in memory, persist them as runs and k-way merge the runs.
    /// Rows are re-serialized, quoting may differ from the source.
    Runs,
}

impl FromStr for ExternalMode {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "index" => Ok(ExternalMode::Index),
            "runs" => Ok(ExternalMode::Runs),
            other => Err(SortError::invalid_rule(format!("unsupported external mode: {other}"))),
        }
    }
}
