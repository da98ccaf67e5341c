use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};

use crate::error::{SortError, SortResult};
use crate::record::Record;
use crate::schema::Schema;

/// Line terminator style of a delimited file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Lf => { b"\n" }
            LineEnding::CrLf => { b"\r\n" }
        }
    }

    /// Detect the terminator of the first line of `path`, defaulting to `\n`
    pub fn detect(path: &Path) -> SortResult<LineEnding> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut line = Vec::new();
        reader.read_until(b'\n', &mut line)?;
        if line.ends_with(b"\r\n") {
            Ok(LineEnding::CrLf)
        } else {
            Ok(LineEnding::Lf)
        }
    }
}

const PARSE_BUFFER_CAPACITY: usize = 8 * 1024;
const CONTEXT_BYTES: usize = 64;

/// Leading bytes of `line` for error messages
fn line_context(line: &[u8]) -> String {
    if line.len() <= CONTEXT_BYTES {
        format!("line \"{}\"", String::from_utf8_lossy(line))
    } else {
        format!("line \"{}...\" of {} bytes", String::from_utf8_lossy(&line[..CONTEXT_BYTES]), line.len())
    }
}

/// Reads and writes delimited records. Fields are trimmed when parsed, missing trailing
/// fields become nulls and nulls are written as empty fields.
#[derive(Clone, Debug)]
pub struct CsvFormat {
    separator: u8,
}

impl CsvFormat {
    pub fn new(separator: u8) -> CsvFormat {
        CsvFormat {
            separator,
        }
    }

    /// Resolve the format from the file extension. `.csv` files use `separator`, `.tsv`
    /// files use TAB, anything else is [SortError::UnsupportedFormat].
    pub fn for_path(path: &Path, separator: u8) -> SortResult<CsvFormat> {
        let extension = path.extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => { Ok(CsvFormat::new(separator)) }
            Some("tsv") => { Ok(CsvFormat::new(b'\t')) }
            _ => {
                Err(SortError::UnsupportedFormat { path: path.to_path_buf() })
            }
        }
    }

    pub fn separator(&self) -> u8 {
        self.separator
    }

    fn reader_builder(&self, has_headers: bool) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.separator)
            .has_headers(has_headers)
            .flexible(true)
            .trim(Trim::All);
        builder
    }

    fn writer_builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(self.separator)
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'));
        builder
    }

    /// Parse a header line into a [Schema]
    pub fn parse_header(&self, line: &[u8]) -> SortResult<Schema> {
        let mut reader = self.reader_builder(false).from_reader(line);
        let mut fields = StringRecord::new();
        let found = reader.read_record(&mut fields)
            .map_err(|e| SortError::from_csv("header", e))?;
        if !found {
            return Schema::new(vec![]);
        }
        Schema::new(fields.iter().map(str::to_string).collect())
    }

    /// Parse exactly one data line. A blank line is a record of nulls.
    pub fn parse(&self, schema: &Schema, line: &[u8]) -> SortResult<Record> {
        let mut reader = self.reader_builder(false)
            .buffer_capacity(line.len().clamp(1, PARSE_BUFFER_CAPACITY))
            .from_reader(line);
        let mut fields = StringRecord::with_capacity(line.len(), schema.len());
        let found = reader.read_record(&mut fields)
            .map_err(|e| SortError::from_csv(line_context(line), e))?;
        if found {
            Ok(Record::from_fields(schema, fields.iter()))
        } else {
            Ok(Record::new(vec![None; schema.len()]))
        }
    }

    /// Serialize a record in schema order followed by any fields beyond the schema, without
    /// line terminator
    pub fn serialize(&self, schema: &Schema, record: &Record) -> SortResult<Vec<u8>> {
        let width = schema.len().max(record.values().len());
        self.serialize_fields((0..width).map(|position| record.get(position).unwrap_or("")))
    }

    pub fn serialize_header(&self, schema: &Schema) -> SortResult<Vec<u8>> {
        self.serialize_fields(schema.columns().iter().map(String::as_str))
    }

    fn serialize_fields<'a, I>(&self, fields: I) -> SortResult<Vec<u8>>
        where I: IntoIterator<Item=&'a str> {
        let mut writer = self.writer_builder().from_writer(Vec::new());
        writer.write_record(fields)
            .map_err(|e| SortError::from_csv("record", e))?;
        let mut bytes = writer.into_inner()
            .map_err(|e| SortError::Io(e.into_error()))?;
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        Ok(bytes)
    }

    /// Stream the records of `reader`, the first record is the header
    pub fn records<R: Read>(&self, reader: R) -> SortResult<RecordReader<R>> {
        let mut reader = self.reader_builder(true).from_reader(reader);
        let headers = reader.headers()
            .map_err(|e| SortError::from_csv("header", e))?;
        let schema = Schema::new(headers.iter().map(str::to_string).collect())?;
        Ok(
            RecordReader {
                reader,
                schema,
                fields: StringRecord::new(),
            }
        )
    }
}

/// Sequential record cursor over delimited text
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
    schema: Schema,
    fields: StringRecord,
}

impl<R: Read> RecordReader<R> {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn next_record(&mut self) -> SortResult<Option<Record>> {
        let found = self.reader.read_record(&mut self.fields)
            .map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                SortError::from_csv(format!("line {line}"), e)
            })?;
        if found {
            Ok(Some(Record::from_fields(&self.schema, self.fields.iter())))
        } else {
            Ok(None)
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = SortResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
