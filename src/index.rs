use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::csv_format::LineEnding;
use crate::error::{SortError, SortResult};
use crate::strategy::Sequence;
use crate::temp_area::{discard, TempArea};

/// Size of one serialized [IndexEntry]
pub const INDEX_ENTRY_SIZE: usize = 12;

/// Location of one data line in the source file, terminator excluded.
///
/// Serialized as an 8 byte big-endian offset followed by a 4 byte big-endian length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    offset: u64,
    length: u32,
}

impl IndexEntry {
    pub fn new(offset: u64, length: u32) -> IndexEntry {
        IndexEntry {
            offset,
            length,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn to_bytes(&self) -> [u8; INDEX_ENTRY_SIZE] {
        let mut bytes = [0u8; INDEX_ENTRY_SIZE];
        bytes[..8].copy_from_slice(&self.offset.to_be_bytes());
        bytes[8..].copy_from_slice(&self.length.to_be_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; INDEX_ENTRY_SIZE]) -> IndexEntry {
        let mut offset = [0u8; 8];
        let mut length = [0u8; 4];
        offset.copy_from_slice(&bytes[..8]);
        length.copy_from_slice(&bytes[8..]);
        IndexEntry {
            offset: u64::from_be_bytes(offset),
            length: u32::from_be_bytes(length),
        }
    }
}

/// Binary index file of fixed size entries, sorted in place through random access reads and
/// writes. Holds no entries in memory.
pub(crate) struct IndexFile {
    file: NamedTempFile,
    len: usize,
    temp_area: TempArea,
}

impl IndexFile {
    fn new(file: NamedTempFile, len: usize, temp_area: TempArea) -> IndexFile {
        IndexFile {
            file,
            len,
            temp_area,
        }
    }

    fn position(i: usize) -> SeekFrom {
        SeekFrom::Start((i * INDEX_ENTRY_SIZE) as u64)
    }

    /// Visit all entries in index order with a sequential buffered read
    pub(crate) fn for_each<F>(&mut self, buffer_size: usize, mut visit: F) -> SortResult<()>
        where F: FnMut(IndexEntry) -> SortResult<()> {
        let file = self.file.as_file_mut();
        file.seek(SeekFrom::Start(0))?;
        let mut reader = BufReader::with_capacity(buffer_size, file);
        let mut bytes = [0u8; INDEX_ENTRY_SIZE];
        for _ in 0..self.len {
            reader.read_exact(&mut bytes)?;
            visit(IndexEntry::from_bytes(&bytes))?;
        }
        Ok(())
    }

    /// Read all entries into memory
    pub(crate) fn load(&mut self, buffer_size: usize) -> SortResult<Vec<IndexEntry>> {
        let mut entries = Vec::with_capacity(self.len);
        self.for_each(buffer_size, |entry| {
            entries.push(entry);
            Ok(())
        })?;
        Ok(entries)
    }

    /// Overwrite the index with `entries`
    pub(crate) fn store(&mut self, entries: &[IndexEntry], buffer_size: usize) -> SortResult<()> {
        let file = self.file.as_file_mut();
        file.seek(SeekFrom::Start(0))?;
        let mut writer = BufWriter::with_capacity(buffer_size, file);
        for entry in entries {
            writer.write_all(&entry.to_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub(crate) fn close(self) {
        discard(self.file.into_temp_path());
    }
}

impl Sequence for IndexFile {
    type Item = IndexEntry;

    fn len(&self) -> usize {
        self.len
    }

    fn get(&mut self, i: usize) -> SortResult<IndexEntry> {
        let file = self.file.as_file_mut();
        file.seek(Self::position(i))?;
        let mut bytes = [0u8; INDEX_ENTRY_SIZE];
        file.read_exact(&mut bytes)?;
        Ok(IndexEntry::from_bytes(&bytes))
    }

    fn set(&mut self, i: usize, item: IndexEntry) -> SortResult<()> {
        let file = self.file.as_file_mut();
        file.seek(Self::position(i))?;
        file.write_all(&item.to_bytes())?;
        Ok(())
    }

    fn auxiliary(&mut self) -> SortResult<IndexFile> {
        let file = self.temp_area.create("idx-aux", ".bin")?;
        file.as_file().set_len((self.len * INDEX_ENTRY_SIZE) as u64)?;
        Ok(IndexFile::new(file, self.len, self.temp_area.clone()))
    }
}

/// Result of a single forward scan over a delimited file: the header line, the line
/// terminator style and a binary index of every data line.
pub(crate) struct LineIndex {
    header: Vec<u8>,
    line_ending: LineEnding,
    trailing_terminator: bool,
    entries: IndexFile,
}

impl LineIndex {
    /// Scan `source` once. The first line is the header, every other line becomes one
    /// [IndexEntry]. `\n` and `\r\n` terminators are recognized; the style of the first
    /// terminator is used when the file is rewritten.
    ///
    /// A line longer than `max_line_bytes` is a [SortError::LineTooLarge].
    pub(crate) fn build(source: &Path, max_line_bytes: usize, buffer_size: usize, temp_area: &TempArea) -> SortResult<LineIndex> {
        let max_length = (max_line_bytes as u64).min(u32::MAX as u64);
        let check = |offset: u64, length: u64| {
            if length > max_length {
                Err(SortError::LineTooLarge { offset, length, max: max_line_bytes })
            } else {
                Ok(())
            }
        };

        let index_file = temp_area.create("idx", ".bin")?;
        let mut writer = BufWriter::with_capacity(buffer_size, index_file);
        let mut reader = BufReader::with_capacity(buffer_size, File::open(source)?);

        let mut header: Option<Vec<u8>> = None;
        let mut header_bytes = Vec::new();
        let mut line_ending = None;
        let mut count: usize = 0;
        let mut pos: u64 = 0;
        let mut line_start: u64 = 0;
        let mut previous_cr = false;

        loop {
            let buffer = reader.fill_buf()?;
            if buffer.is_empty() {
                break;
            }
            let consumed = buffer.len();
            for &byte in buffer {
                if byte == b'\n' {
                    let mut length = pos - line_start;
                    let crlf = previous_cr && length > 0;
                    if crlf {
                        length -= 1;
                    }
                    check(line_start, length)?;
                    line_ending.get_or_insert(if crlf { LineEnding::CrLf } else { LineEnding::Lf });
                    if header.is_none() {
                        if crlf {
                            header_bytes.pop();
                        }
                        header = Some(std::mem::take(&mut header_bytes));
                    } else {
                        writer.write_all(&IndexEntry::new(line_start, length as u32).to_bytes())?;
                        count += 1;
                    }
                    line_start = pos + 1;
                } else if header.is_none() {
                    header_bytes.push(byte);
                    // a trailing CR may still turn out to be part of a CRLF terminator
                    let length = header_bytes.len() as u64 - u64::from(byte == b'\r');
                    check(line_start, length)?;
                }
                previous_cr = byte == b'\r';
                pos += 1;
            }
            reader.consume(consumed);
        }

        let trailing_terminator = pos > 0 && pos == line_start;
        if pos > line_start {
            let length = pos - line_start;
            check(line_start, length)?;
            if header.is_none() {
                header = Some(header_bytes);
            } else {
                writer.write_all(&IndexEntry::new(line_start, length as u32).to_bytes())?;
                count += 1;
            }
        }

        let index_file = writer.into_inner()
            .map_err(|e| SortError::Io(e.into_error()))?;
        log::info!("Indexed {} data lines of {}", count, source.display());

        Ok(
            LineIndex {
                header: header.unwrap_or_default(),
                line_ending: line_ending.unwrap_or_default(),
                trailing_terminator,
                entries: IndexFile::new(index_file, count, temp_area.clone()),
            }
        )
    }

    pub(crate) fn header(&self) -> &[u8] {
        &self.header
    }

    pub(crate) fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Whether the last line of the source is terminated
    pub(crate) fn trailing_terminator(&self) -> bool {
        self.trailing_terminator
    }

    /// Number of data lines
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&mut self) -> &mut IndexFile {
        &mut self.entries
    }

    pub(crate) fn close(self) {
        self.entries.close();
    }
}

/// Random access reader of indexed lines
pub(crate) struct LineReader {
    file: File,
    buffer: Vec<u8>,
    max_line_bytes: usize,
}

impl LineReader {
    pub(crate) fn open(source: &Path, max_line_bytes: usize) -> SortResult<LineReader> {
        Ok(
            LineReader {
                file: File::open(source)?,
                buffer: Vec::new(),
                max_line_bytes,
            }
        )
    }

    /// Read the exact bytes of the line at `entry`
    pub(crate) fn read(&mut self, entry: &IndexEntry) -> SortResult<&[u8]> {
        let length = entry.length() as usize;
        if length > self.max_line_bytes {
            return Err(SortError::LineTooLarge {
                offset: entry.offset(),
                length: length as u64,
                max: self.max_line_bytes,
            });
        }
        self.buffer.resize(length, 0);
        self.file.seek(SeekFrom::Start(entry.offset()))?;
        self.file.read_exact(&mut self.buffer)?;
        Ok(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use crate::csv_format::LineEnding;
    use crate::error::SortError;
    use crate::index::{IndexEntry, LineIndex, LineReader};
    use crate::strategy::Sequence;
    use crate::temp_area::TempArea;

    fn build(content: &[u8], max_line_bytes: usize) -> Result<(tempfile::TempDir, PathBuf, Result<LineIndex, SortError>), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("data.csv");
        fs::write(&source, content)?;
        let area = TempArea::new(dir.path().to_path_buf(), "test-".to_string());
        // small buffer so lines straddle buffer refills
        let index = LineIndex::build(&source, max_line_bytes, 4, &area);
        Ok((dir, source, index))
    }

    #[test]
    fn test_entry_layout() {
        let entry = IndexEntry::new(0x0102030405060708, 0x0a0b0c0d);
        let bytes = entry.to_bytes();
        assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7, 8, 0x0a, 0x0b, 0x0c, 0x0d]);
        assert_eq!(IndexEntry::from_bytes(&bytes), entry);
    }

    #[test]
    fn test_build_lf() -> Result<(), anyhow::Error> {
        let (_dir, source, index) = build(b"id,name\n2,b\n1,a\n", 1024)?;
        let mut index = index?;
        assert_eq!(index.header(), b"id,name");
        assert_eq!(index.line_ending(), LineEnding::Lf);
        assert!(index.trailing_terminator());
        assert_eq!(index.len(), 2);
        let entries = index.entries().load(16)?;
        assert_eq!(entries, vec![IndexEntry::new(8, 3), IndexEntry::new(12, 3)]);

        let mut lines = LineReader::open(&source, 1024)?;
        assert_eq!(lines.read(&entries[1])?, b"1,a");
        Ok(())
    }

    #[test]
    fn test_build_crlf_without_trailing_terminator() -> Result<(), anyhow::Error> {
        let (_dir, _source, index) = build(b"id,name\r\n2,b\r\n1,a", 1024)?;
        let mut index = index?;
        assert_eq!(index.header(), b"id,name");
        assert_eq!(index.line_ending(), LineEnding::CrLf);
        assert!(!index.trailing_terminator());
        assert_eq!(index.entries().get(0)?, IndexEntry::new(9, 3));
        assert_eq!(index.entries().get(1)?, IndexEntry::new(14, 3));
        Ok(())
    }

    #[test]
    fn test_header_only_and_empty() -> Result<(), anyhow::Error> {
        let (_dir, _source, index) = build(b"id,name\n", 1024)?;
        let index = index?;
        assert_eq!(index.len(), 0);
        assert_eq!(index.header(), b"id,name");

        let (_dir, _source, index) = build(b"", 1024)?;
        let index = index?;
        assert_eq!(index.len(), 0);
        assert!(index.header().is_empty());
        assert!(!index.trailing_terminator());
        Ok(())
    }

    #[test]
    fn test_line_too_large() -> Result<(), anyhow::Error> {
        let (_dir, _source, index) = build(b"id,name\n1,short\n2,much longer line\n", 10)?;
        match index {
            Err(SortError::LineTooLarge { offset, length, max }) => {
                assert_eq!(offset, 16);
                assert_eq!(length, 18);
                assert_eq!(max, 10);
            }
            _ => panic!("expected LineTooLarge"),
        }
        Ok(())
    }

    #[test]
    fn test_crlf_header_at_max_length() -> Result<(), anyhow::Error> {
        let (_dir, _source, index) = build(b"kk\r\n2\r\n1\r\n", 2)?;
        let index = index?;
        assert_eq!(index.header(), b"kk");
        assert_eq!(index.line_ending(), LineEnding::CrLf);
        assert_eq!(index.len(), 2);

        let (_dir, _source, index) = build(b"kk\rx\n2\n", 2)?;
        assert!(matches!(index, Err(SortError::LineTooLarge { offset: 0, .. })));
        let (_dir, _source, index) = build(b"kkk\r\n2\r\n", 2)?;
        assert!(matches!(index, Err(SortError::LineTooLarge { offset: 0, length: 3, .. })));
        Ok(())
    }

    #[test]
    fn test_index_file_sequence() -> Result<(), anyhow::Error> {
        let (_dir, _source, index) = build(b"h\na\nbb\nccc\n", 1024)?;
        let mut index = index?;
        let entries = index.entries();
        entries.swap(0, 2)?;
        assert_eq!(entries.get(0)?.length(), 3);
        assert_eq!(entries.get(2)?.length(), 1);

        let mut aux = entries.auxiliary()?;
        assert_eq!(aux.len(), 3);
        aux.set(1, IndexEntry::new(42, 7))?;
        assert_eq!(aux.get(1)?, IndexEntry::new(42, 7));

        entries.store(&[IndexEntry::new(1, 1), IndexEntry::new(2, 2), IndexEntry::new(3, 3)], 8)?;
        assert_eq!(entries.load(8)?[2], IndexEntry::new(3, 3));
        Ok(())
    }
}
