use std::cmp::max;
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use rlimit::{getrlimit, Resource, setrlimit};
use tempfile::{NamedTempFile, TempPath};

use crate::comparator::RecordComparator;
use crate::config::Config;
use crate::csv_format::{CsvFormat, LineEnding, RecordReader};
use crate::error::{SortError, SortResult};
use crate::record::Record;
use crate::run::RunCursor;
use crate::schema::Schema;
use crate::temp_area::{discard, replace_file, TempArea};

/// Spare descriptors on top of one per run
const RESERVED_FILES: u64 = 256;

/// Serializes records to a run or output file with a fixed line terminator
struct RecordWriter<'a> {
    writer: BufWriter<NamedTempFile>,
    format: &'a CsvFormat,
    schema: &'a Schema,
    terminator: &'static [u8],
}

impl<'a> RecordWriter<'a> {
    fn create(temp_area: &TempArea, role: &str, format: &'a CsvFormat, schema: &'a Schema, line_ending: LineEnding, buffer_size: usize) -> SortResult<RecordWriter<'a>> {
        let file = temp_area.create(role, ".csv")?;
        let mut writer = RecordWriter {
            writer: BufWriter::with_capacity(buffer_size, file),
            format,
            schema,
            terminator: line_ending.as_bytes(),
        };
        let header = format.serialize_header(schema)?;
        writer.write_line(&header)?;
        Ok(writer)
    }

    fn write_line(&mut self, line: &[u8]) -> SortResult<()> {
        self.writer.write_all(line)?;
        self.writer.write_all(self.terminator)?;
        Ok(())
    }

    fn write(&mut self, record: &Record) -> SortResult<()> {
        let line = self.format.serialize(self.schema, record)?;
        self.write_line(&line)
    }

    fn finish(self) -> SortResult<TempPath> {
        let file = self.writer.into_inner()
            .map_err(|e| SortError::Io(e.into_error()))?;
        file.as_file().sync_all()?;
        Ok(file.into_temp_path())
    }
}

/// Sort `source` in place by sorting bounded chunks into run files and merging them.
///
/// Rows are re-serialized, so quoting and spacing of the output may differ from the source.
pub(crate) fn sort_by_runs(source: &Path, config: &Config) -> SortResult<()> {
    let format = CsvFormat::for_path(source, config.field_separator())?;
    let line_ending = LineEnding::detect(source)?;
    let temp_area = config.temp_area();

    log::info!("Runs sort of {} using {}, {} rows per run", source.display(), config.algorithm().name(), config.max_rows_in_memory());
    let reader = BufReader::with_capacity(config.io_buffer_size(), File::open(source)?);
    let mut records = format.records(reader)?;
    let schema = records.schema().clone();
    if schema.is_empty() {
        log::info!("{} is empty, nothing to sort", source.display());
        return Ok(());
    }
    let comparator = RecordComparator::new(&schema, config.keys(), config.locale())?;

    let (mut runs, rows) = partition(&mut records, &comparator, &format, &schema, line_ending, &temp_area, config)?;
    log::info!("Partitioned {} rows into {} runs", rows, runs.len());

    if rows < 2 {
        log::info!("{} has {} data rows, nothing to sort", source.display(), rows);
        runs.into_iter().for_each(discard);
        return Ok(());
    }

    let merged = if runs.len() == 1 {
        runs.remove(0)
    } else {
        let merged = with_open_file_limit(runs.len() as u64, || {
            merge(&runs, &temp_area, &format, &schema, &comparator, line_ending, config.io_buffer_size())
        });
        runs.into_iter().for_each(discard);
        merged?
    };
    replace_file(merged, source)
}

/// Split the records into sorted run files of at most `max_rows_in_memory` rows. Returns the
/// runs in input order and the number of rows read.
fn partition<R: Read>(
    records: &mut RecordReader<R>,
    comparator: &RecordComparator,
    format: &CsvFormat,
    schema: &Schema,
    line_ending: LineEnding,
    temp_area: &TempArea,
    config: &Config,
) -> SortResult<(Vec<TempPath>, usize)> {
    let mut runs = Vec::new();
    let mut rows = 0;
    let mut buffer = Vec::with_capacity(config.max_rows_in_memory());
    let mut write_run = |buffer: &mut Vec<Record>| -> SortResult<()> {
        config.algorithm().sort_by(buffer, |a, b| comparator.compare(a, b))?;
        let mut writer = RecordWriter::create(temp_area, "run", format, schema, line_ending, config.io_buffer_size())?;
        for record in buffer.iter() {
            writer.write(record)?;
        }
        let run = writer.finish()?;
        log::debug!("Wrote run {} of {} rows to {}", runs.len(), buffer.len(), run.display());
        runs.push(run);
        buffer.clear();
        Ok(())
    };
    while let Some(record) = records.next_record()? {
        buffer.push(record);
        rows += 1;
        if buffer.len() == config.max_rows_in_memory() {
            write_run(&mut buffer)?;
        }
    }
    if !buffer.is_empty() {
        write_run(&mut buffer)?;
    }
    Ok((runs, rows))
}

/// K-way merge of sorted run files into a new temp file
fn merge(
    runs: &[TempPath],
    temp_area: &TempArea,
    format: &CsvFormat,
    schema: &Schema,
    comparator: &RecordComparator,
    line_ending: LineEnding,
    buffer_size: usize,
) -> SortResult<TempPath> {
    log::info!("Merging {} runs", runs.len());
    let mut heap = BinaryHeap::with_capacity(runs.len());
    for (index, run) in runs.iter().enumerate() {
        let cursor = RunCursor::open(index, run, format, comparator)?;
        if cursor.head().is_some() {
            heap.push(cursor);
        }
    }

    let mut writer = RecordWriter::create(temp_area, "merge", format, schema, line_ending, buffer_size)?;
    let mut merged: usize = 0;
    while let Some(mut cursor) = heap.pop() {
        if let Some(record) = cursor.advance()? {
            writer.write(&record)?;
            merged += 1;
        }
        if cursor.head().is_some() {
            heap.push(cursor);
        }
    }
    log::info!("Merged {} rows", merged);
    writer.finish()
}

/// Run `f` with the soft `RLIMIT_NOFILE` raised to accommodate `files` open runs, then
/// restore the previous limit
fn with_open_file_limit<T, F>(files: u64, f: F) -> SortResult<T>
    where F: FnOnce() -> SortResult<T> {
    let (current_soft, current_hard) = getrlimit(Resource::NOFILE)?;
    log::info!("Current rlimit NOFILE, soft: {}, hard: {}", current_soft, current_hard);
    let new_soft = max(files + RESERVED_FILES, current_soft).min(current_hard);
    log::info!("Set new rlimit NOFILE, soft: {}, hard: {}", new_soft, current_hard);
    setrlimit(Resource::NOFILE, new_soft, current_hard)?;

    let result = f();

    log::info!("Restore rlimit NOFILE, soft: {}, hard: {}", current_soft, current_hard);
    let restored = setrlimit(Resource::NOFILE, current_soft, current_hard);
    let value = result?;
    restored?;
    Ok(value)
}
