//! This crate sorts delimited text files, such as CSV and TSV, by one or more typed keys.
//!
//! Each key names a column, a type (STRING, NUMBER, DATE or BOOLEAN), a direction and null
//! placement. Values are kept as text and coerced only when compared, so `"1,5"` and `"1.5"`
//! are equal numbers and unparsable values are treated as nulls. Column types can be inferred
//! from a sample of the file.
//!
//! Small files can be loaded into a [DataSet](data_set::DataSet) and sorted in memory. Files of
//! any size are sorted in place by [Sort](sort::Sort) using one of two external strategies:
//! * [ExternalMode::Index](external_mode::ExternalMode::Index) sorts a 12 byte per line index
//!   and rewrites the file once, copying every line byte for byte.
//! * [ExternalMode::Runs](external_mode::ExternalMode::Runs) sorts bounded chunks of rows,
//!   writes them as run files and merges the runs.
//!
//! In both modes the result is written to a temp file that replaces the original only when it
//! is complete, so an interrupted or failed sort leaves the original file unchanged. Any of
//! four algorithms, see [Algorithm](strategy::Algorithm), sorts the rows or the index.
//!
//! # Examples
//! ```
//! use std::path::PathBuf;
//! use tabular_file_sort::column_type::ColumnType;
//! use tabular_file_sort::external_mode::ExternalMode;
//! use tabular_file_sort::order::Order;
//! use tabular_file_sort::sort::Sort;
//! use tabular_file_sort::sort_key::SortKey;
//! use tabular_file_sort::strategy::Algorithm;
//!
//! fn sort_people(path: PathBuf, tmp: PathBuf) -> Result<(), anyhow::Error> {
//!     let mut sort = Sort::new(path);
//!     sort.add_key(SortKey::new("name", ColumnType::String).with_case_insensitive(true));
//!     sort.add_key(SortKey::new("age", ColumnType::Number).with_order(Order::Desc));
//!
//!     // sort chunks of 100 000 rows in memory and merge them
//!     sort.with_external_mode(ExternalMode::Runs);
//!     sort.with_max_rows_in_memory(100_000);
//!     sort.with_algorithm(Algorithm::QuickSort);
//!
//!     // set the directory for intermediate results. The default is the system temp dir -
//!     // std::env::temp_dir(), however, for large files it is recommended to provide a dedicated
//!     // directory for intermediate files, preferably on the same file system as the sorted file.
//!     sort.with_tmp_dir(tmp);
//!
//!     sort.sort()
//! }
//! ```
//!

pub(crate) mod config;
pub(crate) mod temp_area;
pub(crate) mod index;
pub(crate) mod index_sort;
pub(crate) mod run;
pub(crate) mod runs_sort;

pub mod sort;
pub mod data_set;
pub mod sort_key;
pub mod column_type;
pub mod order;
pub mod schema;
pub mod record;
pub mod value;
pub mod inference;
pub mod comparator;
pub mod locale;
pub mod strategy;
pub mod external_mode;
pub mod csv_format;
pub mod error;
