use std::path::PathBuf;

use crate::external_mode::ExternalMode;
use crate::locale::Locale;
use crate::sort_key::SortKey;
use crate::strategy::Algorithm;
use crate::temp_area::TempArea;

pub(crate) const DEFAULT_MAX_LINE_BYTES: usize = 1_048_576;
pub(crate) const DEFAULT_IO_BUFFER_SIZE: usize = 64 * 1024;
pub(crate) const DEFAULT_MAX_ROWS_IN_MEMORY: usize = 50_000;
pub(crate) const DEFAULT_TMP_PREFIX: &str = "tabsort-";

#[derive(Clone, Debug)]
pub(crate) struct Config {
    tmp: PathBuf,
    tmp_prefix: String,
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

impl Config {
    pub(crate) fn new(
        tmp: PathBuf,
        tmp_prefix: String,
        field_separator: u8,
        max_line_bytes: usize,
        io_buffer_size: usize,
        max_rows_in_memory: usize,
        external_mode: ExternalMode,
        algorithm: Algorithm,
        locale: Locale,
        index_in_memory: bool,
        keys: Vec<SortKey>,
    ) -> Config {
        Config {
            tmp,
            tmp_prefix,
            field_separator,
            max_line_bytes,
            io_buffer_size: io_buffer_size.max(1),
            max_rows_in_memory: max_rows_in_memory.max(1),
            external_mode,
            algorithm,
            locale,
            index_in_memory,
            keys,
        }
    }

    pub(crate) fn temp_area(&self) -> TempArea {
        TempArea::new(self.tmp.clone(), self.tmp_prefix.clone())
    }

    pub(crate) fn field_separator(&self) -> u8 {
        self.field_separator
    }

    pub(crate) fn max_line_bytes(&self) -> usize {
        self.max_line_bytes
    }

    pub(crate) fn io_buffer_size(&self) -> usize {
        self.io_buffer_size
    }

    pub(crate) fn max_rows_in_memory(&self) -> usize {
        self.max_rows_in_memory
    }

    pub(crate) fn external_mode(&self) -> ExternalMode {
        self.external_mode
    }

    pub(crate) fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn locale(&self) -> &Locale {
        &self.locale
    }

    pub(crate) fn index_in_memory(&self) -> bool {
        self.index_in_memory
    }

    pub(crate) fn keys(&self) -> &Vec<SortKey> {
        &self.keys
    }

    #[cfg(test)]
    pub(crate) fn set_index_in_memory(&mut self, index_in_memory: bool) {
        self.index_in_memory = index_in_memory;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use crate::config::{Config, DEFAULT_IO_BUFFER_SIZE, DEFAULT_MAX_LINE_BYTES, DEFAULT_TMP_PREFIX};
    use crate::external_mode::ExternalMode;
    use crate::locale::Locale;
    use crate::sort_key::SortKey;
    use crate::strategy::Algorithm;

    /// Config with small thresholds for unit tests
    pub(crate) fn test_config(tmp: PathBuf, keys: Vec<SortKey>, algorithm: Algorithm, max_rows_in_memory: usize) -> Config {
        Config::new(
            tmp,
            DEFAULT_TMP_PREFIX.to_string(),
            b',',
            DEFAULT_MAX_LINE_BYTES,
            DEFAULT_IO_BUFFER_SIZE,
            max_rows_in_memory,
            ExternalMode::Index,
            algorithm,
            Locale::default(),
            false,
            keys,
        )
    }
}
