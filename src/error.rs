use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds surfaced by the sorting engine.
///
/// The public [Sort](crate::sort::Sort) and [DataSet](crate::data_set::DataSet) API returns
/// [anyhow::Error] with context attached; the kind can be recovered with
/// `error.downcast_ref::<SortError>()`.
#[derive(Error, Debug)]
pub enum SortError {
    /// No record format is registered for the file
    #[error("unsupported format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// A line exceeds the configured maximum line length in Index mode
    #[error("line at byte offset {offset} is {length} bytes long, maximum is {max} bytes")]
    LineTooLarge { offset: u64, length: u64, max: usize },

    /// A line cannot be decoded into a record
    #[error("failed to parse {context}: {message}")]
    ParseFailure { context: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A sort key references an unknown column or an unsupported type
    #[error("invalid sort rule: {message}")]
    InvalidRule { message: String },

    /// Both the rename and the copy fallback failed to replace the file
    #[error("failed to replace {}: {source}", .target.display())]
    AtomicReplace { target: PathBuf, source: io::Error },
}

impl SortError {
    pub fn parse_failure(context: impl Into<String>, message: impl ToString) -> Self {
        SortError::ParseFailure {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_rule(message: impl Into<String>) -> Self {
        SortError::InvalidRule {
            message: message.into(),
        }
    }

    /// Map a [csv::Error], keeping I/O failures apart from decoding failures.
    pub(crate) fn from_csv(context: impl Into<String>, error: csv::Error) -> Self {
        if error.is_io_error() {
            match error.into_kind() {
                csv::ErrorKind::Io(e) => SortError::Io(e),
                other => SortError::parse_failure(context, format!("{:?}", other)),
            }
        } else {
            SortError::parse_failure(context, error)
        }
    }
}

pub type SortResult<T> = Result<T, SortError>;
