use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::column_type::ColumnType;
use crate::comparator::RecordComparator;
use crate::config::{Config, DEFAULT_IO_BUFFER_SIZE, DEFAULT_MAX_LINE_BYTES, DEFAULT_MAX_ROWS_IN_MEMORY, DEFAULT_TMP_PREFIX};
use crate::csv_format::CsvFormat;
use crate::data_set::DataSet;
use crate::external_mode::ExternalMode;
use crate::index_sort::sort_by_index;
use crate::inference::{infer_column_type, SAMPLE_ROWS};
use crate::locale::Locale;
use crate::runs_sort::sort_by_runs;
use crate::sort_key::SortKey;
use crate::strategy::Algorithm;

/// Sort a delimited text file in place by typed keys
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use tabular_file_sort::column_type::ColumnType;
/// use tabular_file_sort::external_mode::ExternalMode;
/// use tabular_file_sort::order::Order;
/// use tabular_file_sort::sort::Sort;
/// use tabular_file_sort::sort_key::SortKey;
///
/// fn sort_by_price(path: PathBuf, tmp: PathBuf) -> Result<(), anyhow::Error> {
///     let mut sort = Sort::new(path);
///     sort.add_key(SortKey::new("price", ColumnType::Number).with_order(Order::Desc));
///     sort.add_key(SortKey::new("name", ColumnType::String).with_case_insensitive(true));
///     // rewrite the file line by line in the new order, keeping the original formatting
///     sort.with_external_mode(ExternalMode::Index);
///     // set the directory for intermediate files. The default is the system temp dir -
///     // std::env::temp_dir(). A directory on the same file system as the sorted file keeps
///     // the final replace atomic.
///     sort.with_tmp_dir(tmp);
///     sort.sort()
/// }
/// ```
pub struct Sort {
    path: PathBuf,
    tmp: PathBuf,
    field_separator: u8,
    max_line_bytes: usize,
    io_buffer_size: usize,
    max_rows_in_memory: usize,
    external_mode: ExternalMode,
    algorithm: Algorithm,
    locale: Locale,
    index_in_memory: bool,
    keys: Vec<SortKey>,
}

impl Sort {
    /// Create a default Sort definition for the file at `path`.
    ///
    /// * intermediate files go to std::env::temp_dir()
    /// * the field separator of `.csv` files is ',', `.tsv` files always use TAB
    /// * lines longer than 1 MiB fail an Index mode sort
    /// * I/O buffers are 64 KiB
    /// * Runs mode sorts chunks of 50 000 rows
    /// * the external mode is [ExternalMode::Index] with a disk resident index
    /// * the algorithm is [Algorithm::MergeSort]
    /// * strings are collated for the `en-US` locale
    /// * there are no keys, all rows tie and keep their order under a stable algorithm
    pub fn new(path: PathBuf) -> Sort {
        Sort {
            path,
            tmp: std::env::temp_dir(),
            field_separator: b',',
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            io_buffer_size: DEFAULT_IO_BUFFER_SIZE,
            max_rows_in_memory: DEFAULT_MAX_ROWS_IN_MEMORY,
            external_mode: ExternalMode::default(),
            algorithm: Algorithm::default(),
            locale: Locale::default(),
            index_in_memory: false,
            keys: vec![],
        }
    }

    /// Set directory for intermediate files. By default use std::env::temp_dir()
    pub fn with_tmp_dir(&mut self, tmp: PathBuf) {
        self.tmp = tmp;
    }

    /// Set the field separator of `.csv` files. The default is ','
    pub fn with_field_separator(&mut self, field_separator: u8) {
        self.field_separator = field_separator
    }

    /// Set the maximum line length in bytes accepted by Index mode
    pub fn with_max_line_bytes(&mut self, max_line_bytes: usize) {
        self.max_line_bytes = max_line_bytes
    }

    pub fn with_io_buffer_size(&mut self, io_buffer_size: usize) {
        self.io_buffer_size = io_buffer_size
    }

    /// Set the number of rows sorted in memory per run in Runs mode
    pub fn with_max_rows_in_memory(&mut self, max_rows_in_memory: usize) {
        self.max_rows_in_memory = max_rows_in_memory
    }

    pub fn with_external_mode(&mut self, external_mode: ExternalMode) {
        self.external_mode = external_mode
    }

    pub fn with_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm
    }

    /// Select the algorithm by name, see [Algorithm::from_name]
    pub fn with_algorithm_name(&mut self, name: &str) {
        self.algorithm = Algorithm::from_name(name)
    }

    pub fn with_locale(&mut self, locale: Locale) {
        self.locale = locale
    }

    /// Load the whole line index into memory for the Index mode sort instead of sorting
    /// the index file in place. Uses 12 bytes per row.
    pub fn with_index_in_memory(&mut self, index_in_memory: bool) {
        self.index_in_memory = index_in_memory
    }

    /// Add a key. Keys take precedence in the order they are added
    pub fn add_key(&mut self, key: SortKey) {
        self.keys.push(key);
    }

    /// Replace all keys with `keys`
    pub fn with_keys(&mut self, keys: Vec<SortKey>) {
        self.keys = keys
    }

    fn create_config(&self) -> Config {
        Config::new(
            self.tmp.clone(),
            DEFAULT_TMP_PREFIX.to_string(),
            self.field_separator,
            self.max_line_bytes,
            self.io_buffer_size,
            self.max_rows_in_memory,
            self.external_mode,
            self.algorithm,
            self.locale.clone(),
            self.index_in_memory,
            self.keys.clone(),
        )
    }

    fn format(&self) -> Result<CsvFormat, anyhow::Error> {
        Ok(CsvFormat::for_path(&self.path, self.field_separator)?)
    }

    /// Sort the file in place.
    ///
    /// The sorted content is written to a temp file which then replaces the original, so on
    /// failure the original file is left unchanged.
    pub fn sort(&self) -> Result<(), anyhow::Error> {
        let config = self.create_config();
        let result = match config.external_mode() {
            ExternalMode::Index => { sort_by_index(&self.path, &config) }
            ExternalMode::Runs => { sort_by_runs(&self.path, &config) }
        };
        result.with_context(|| anyhow!("sort {} in {:?} mode", self.path.display(), config.external_mode()))
    }

    /// Check whether the file is already ordered by the keys
    pub fn check(&self) -> Result<bool, anyhow::Error> {
        let format = self.format()?;
        let file = File::open(&self.path)
            .with_context(|| anyhow!("path: {}", self.path.display()))?;
        let mut records = format.records(BufReader::new(file))?;
        let comparator = RecordComparator::new(records.schema(), &self.keys, &self.locale)?;

        let mut previous = None;
        while let Some(current) = records.next_record()
            .with_context(|| anyhow!("path: {}", self.path.display()))? {
            if let Some(previous) = &previous {
                if comparator.compare(previous, &current).is_gt() {
                    return Ok(false);
                }
            }
            previous = Some(current);
        }
        Ok(true)
    }

    /// Infer the type of every column from the leading rows of the file
    pub fn infer_types(&self) -> Result<Vec<(String, ColumnType)>, anyhow::Error> {
        let format = self.format()?;
        let file = File::open(&self.path)
            .with_context(|| anyhow!("path: {}", self.path.display()))?;
        let mut records = format.records(BufReader::new(file))?;
        let mut sample = Vec::with_capacity(SAMPLE_ROWS);
        while sample.len() < SAMPLE_ROWS {
            match records.next_record()
                .with_context(|| anyhow!("path: {}", self.path.display()))? {
                Some(record) => { sample.push(record) }
                None => { break; }
            }
        }
        Ok(
            records.schema().columns().iter()
                .enumerate()
                .map(|(position, column)| (column.clone(), infer_column_type(&sample, position)))
                .collect()
        )
    }

    /// Read the whole file into memory
    pub fn load(&self) -> Result<DataSet, anyhow::Error> {
        DataSet::read(&self.path, self.field_separator)
    }
}
