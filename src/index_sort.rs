use std::io::{BufWriter, Write};
use std::path::Path;

use crate::comparator::RecordComparator;
use crate::config::Config;
use crate::csv_format::CsvFormat;
use crate::error::{SortError, SortResult};
use crate::index::{IndexEntry, LineIndex, LineReader};
use crate::temp_area::replace_file;

/// Sort `source` in place by reordering a line index instead of the rows.
///
/// Only 12 byte index entries move during the sort. Each comparison reads and parses the two
/// lines it compares. The file is then rewritten once in the new order, copying each line's
/// original bytes, and swapped into place.
pub(crate) fn sort_by_index(source: &Path, config: &Config) -> SortResult<()> {
    let format = CsvFormat::for_path(source, config.field_separator())?;
    let temp_area = config.temp_area();

    log::info!("Index sort of {} using {}", source.display(), config.algorithm().name());
    let mut index = LineIndex::build(source, config.max_line_bytes(), config.io_buffer_size(), &temp_area)?;
    if index.len() < 2 {
        log::info!("{} has {} data lines, nothing to sort", source.display(), index.len());
        index.close();
        return Ok(());
    }

    let schema = format.parse_header(index.header())?;
    let comparator = RecordComparator::new(&schema, config.keys(), config.locale())?;

    let mut lines = LineReader::open(source, config.max_line_bytes())?;
    let mut compare = |a: &IndexEntry, b: &IndexEntry| -> SortResult<std::cmp::Ordering> {
        let a = format.parse(&schema, lines.read(a)?)?;
        let b = format.parse(&schema, lines.read(b)?)?;
        Ok(comparator.compare(&a, &b))
    };

    if config.index_in_memory() {
        let mut entries = index.entries().load(config.io_buffer_size())?;
        config.algorithm().sort(&mut entries, &mut compare)?;
        index.entries().store(&entries, config.io_buffer_size())?;
    } else {
        config.algorithm().sort(index.entries(), &mut compare)?;
    }
    log::info!("Sorted index of {} lines", index.len());

    let output = temp_area.create("out", ".tmp")?;
    let mut writer = BufWriter::with_capacity(config.io_buffer_size(), output);
    let terminator = index.line_ending().as_bytes();
    let count = index.len();
    let mut written = 0;
    writer.write_all(index.header())?;
    writer.write_all(terminator)?;
    index.entries().for_each(config.io_buffer_size(), |entry| {
        writer.write_all(lines.read(&entry)?)?;
        written += 1;
        if written < count {
            writer.write_all(terminator)?;
        }
        Ok(())
    })?;
    if index.trailing_terminator() {
        writer.write_all(terminator)?;
    }
    let output = writer.into_inner()
        .map_err(|e| SortError::Io(e.into_error()))?;
    output.as_file().sync_all()?;
    index.close();

    replace_file(output.into_temp_path(), source)?;
    log::info!("Rewrote {} lines of {}", count, source.display());
    Ok(())
}
