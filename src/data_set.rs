use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use crate::column_type::ColumnType;
use crate::comparator::RecordComparator;
use crate::config::DEFAULT_TMP_PREFIX;
use crate::csv_format::CsvFormat;
use crate::error::SortError;
use crate::inference::infer_column_type;
use crate::locale::Locale;
use crate::record::Record;
use crate::schema::Schema;
use crate::sort_key::SortKey;
use crate::strategy::Algorithm;
use crate::temp_area::{replace_file, TempArea};

/// A fully materialized table, for data that fits in memory.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use tabular_file_sort::column_type::ColumnType;
/// use tabular_file_sort::data_set::DataSet;
/// use tabular_file_sort::locale::Locale;
/// use tabular_file_sort::order::Order;
/// use tabular_file_sort::sort_key::SortKey;
/// use tabular_file_sort::strategy::Algorithm;
///
/// fn sort_people(path: &Path) -> Result<(), anyhow::Error> {
///     let mut data_set = DataSet::read(path, b',')?;
///     let keys = vec![
///         SortKey::new("name", ColumnType::String).with_case_insensitive(true),
///         SortKey::new("age", ColumnType::Number).with_order(Order::Desc),
///     ];
///     data_set.sort(&keys, Algorithm::MergeSort, &Locale::default())?;
///     data_set.write(path)
/// }
/// ```
#[derive(Clone, Debug)]
pub struct DataSet {
    schema: Schema,
    rows: Vec<Record>,
    separator: u8,
}

impl DataSet {
    pub fn new(schema: Schema, rows: Vec<Record>) -> DataSet {
        DataSet {
            schema,
            rows,
            separator: b',',
        }
    }

    /// Read every row of a `.csv` or `.tsv` file. `separator` applies to `.csv` files.
    pub fn read(path: &Path, separator: u8) -> Result<DataSet, anyhow::Error> {
        let format = CsvFormat::for_path(path, separator)?;
        let file = File::open(path)
            .with_context(|| anyhow!("path: {}", path.display()))?;
        let mut records = format.records(BufReader::new(file))
            .with_context(|| anyhow!("path: {}", path.display()))?;
        let mut rows = Vec::new();
        while let Some(record) = records.next_record()
            .with_context(|| anyhow!("path: {}", path.display()))? {
            rows.push(record);
        }
        log::info!("Read {} rows from {}", rows.len(), path.display());
        Ok(
            DataSet {
                schema: records.schema().clone(),
                rows,
                separator,
            }
        )
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Sort the rows by `keys`. The rows are sorted as a copy and replaced on success, so a
    /// failure leaves the data set unchanged.
    pub fn sort(&mut self, keys: &[SortKey], algorithm: Algorithm, locale: &Locale) -> Result<(), anyhow::Error> {
        let comparator = RecordComparator::new(&self.schema, keys, locale)?;
        let mut snapshot = self.rows.clone();
        algorithm.sort_by(&mut snapshot, |a, b| comparator.compare(a, b))
            .with_context(|| anyhow!("sort {} rows with {}", snapshot.len(), algorithm.name()))?;
        self.rows = snapshot;
        Ok(())
    }

    /// Inferred type of every column, from a sample of the leading rows
    pub fn infer_types(&self) -> Vec<(String, ColumnType)> {
        self.schema.columns().iter()
            .enumerate()
            .map(|(position, column)| (column.clone(), infer_column_type(&self.rows, position)))
            .collect()
    }

    /// Write the header and rows to `path`, replacing it atomically when it exists
    pub fn write(&self, path: &Path) -> Result<(), anyhow::Error> {
        let format = CsvFormat::for_path(path, self.separator)?;
        let dir = path.parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let temp_area = TempArea::new(dir, DEFAULT_TMP_PREFIX.to_string());

        let output = temp_area.create("out", ".tmp")?;
        let mut writer = BufWriter::new(output);
        writer.write_all(&format.serialize_header(&self.schema)?)?;
        writer.write_all(b"\n")?;
        for record in &self.rows {
            writer.write_all(&format.serialize(&self.schema, record)?)?;
            writer.write_all(b"\n")?;
        }
        let output = writer.into_inner()
            .map_err(|e| SortError::Io(e.into_error()))?;
        output.as_file().sync_all()?;
        replace_file(output.into_temp_path(), path)
            .with_context(|| anyhow!("path: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::column_type::ColumnType;
    use crate::data_set::DataSet;
    use crate::error::SortError;
    use crate::locale::Locale;
    use crate::order::Order;
    use crate::sort_key::SortKey;
    use crate::strategy::Algorithm;

    #[test]
    fn test_read_sort_write() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("people.csv");
        fs::write(&path, "name,age\nBob,30\nAnn,30\nann,25\n")?;

        let mut data_set = DataSet::read(&path, b',')?;
        assert_eq!(data_set.rows().len(), 3);
        let keys = vec![
            SortKey::new("name", ColumnType::String).with_case_insensitive(true),
            SortKey::new("age", ColumnType::Number).with_order(Order::Desc),
        ];
        data_set.sort(&keys, Algorithm::BubbleSort, &Locale::default())?;
        data_set.write(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "name,age\nAnn,30\nann,25\nBob,30\n");
        Ok(())
    }

    #[test]
    fn test_failed_sort_keeps_rows() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.tsv");
        fs::write(&path, "k\tv\n2\tb\n1\ta\n")?;
        let mut data_set = DataSet::read(&path, b',')?;
        let before = data_set.rows().to_vec();
        let result = data_set.sort(&[SortKey::new("missing", ColumnType::String)], Algorithm::QuickSort, &Locale::default());
        let error = result.err().ok_or_else(|| anyhow::anyhow!("expected failure"))?;
        assert!(matches!(error.downcast_ref::<SortError>(), Some(SortError::InvalidRule { .. })));
        assert_eq!(data_set.rows(), before.as_slice());
        Ok(())
    }

    #[test]
    fn test_infer_types() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.csv");
        fs::write(&path, "id,when,ok,name\n10,2023-01-02,yes,a\n20,2023-02-03,no,b\n30,2023-03-04,y,c\n")?;
        let data_set = DataSet::read(&path, b',')?;
        assert_eq!(
            data_set.infer_types(),
            vec![
                ("id".to_string(), ColumnType::Number),
                ("when".to_string(), ColumnType::Date),
                ("ok".to_string(), ColumnType::Boolean),
                ("name".to_string(), ColumnType::String),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_unsupported_format() {
        let result = DataSet::read(std::path::Path::new("data.json"), b',');
        let error = result.err();
        assert!(matches!(
            error.as_ref().and_then(|e| e.downcast_ref::<SortError>()),
            Some(SortError::UnsupportedFormat { .. })
        ));
    }
}
