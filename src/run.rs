use std::cmp::Ordering;
use std::fs::File;
use std::path::Path;

use crate::comparator::RecordComparator;
use crate::csv_format::{CsvFormat, RecordReader};
use crate::error::SortResult;
use crate::record::Record;

/// Sequential cursor over one sorted run file, ordered by its head record so that a
/// [BinaryHeap](std::collections::BinaryHeap) of cursors pops the smallest head first.
pub(crate) struct RunCursor<'c> {
    index: usize,
    records: RecordReader<File>,
    head: Option<Record>,
    comparator: &'c RecordComparator,
}

impl<'c> RunCursor<'c> {
    pub(crate) fn open(index: usize, path: &Path, format: &CsvFormat, comparator: &'c RecordComparator) -> SortResult<RunCursor<'c>> {
        let mut records = format.records(File::open(path)?)?;
        let head = records.next_record()?;
        Ok(
            RunCursor {
                index,
                records,
                head,
                comparator,
            }
        )
    }

    pub(crate) fn head(&self) -> Option<&Record> {
        self.head.as_ref()
    }

    /// Take the current head and read the next one
    pub(crate) fn advance(&mut self) -> SortResult<Option<Record>> {
        let next = self.records.next_record()?;
        Ok(std::mem::replace(&mut self.head, next))
    }
}

impl Eq for RunCursor<'_> {}

impl PartialEq<Self> for RunCursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd<Self> for RunCursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RunCursor<'_> {
    // flipped for BinaryHeap (max heap), ties go to the earlier run
    fn cmp(&self, other: &Self) -> Ordering {
        let heads = match (&self.head, &other.head) {
            (None, None) => Ordering::Equal,
            // exhausted runs pop first so they can be dropped
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => self.comparator.compare(b, a),
        };
        heads.then_with(|| other.index.cmp(&self.index))
    }
}
