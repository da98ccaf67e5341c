use std::cmp::Ordering;

use crate::error::SortResult;
use crate::strategy::{Sequence, SortStrategy};

/// Stable top-down merge sort.
///
/// Uses an auxiliary sequence as long as the input, obtained from [Sequence::auxiliary].
/// A merge is skipped when the two sorted halves are already in order across the midpoint.
/// O(n log n) comparisons in the worst case.
#[derive(Clone, Copy, Debug, Default)]
pub struct MergeSort;

impl SortStrategy for MergeSort {
    fn name(&self) -> &'static str {
        "MergeSort"
    }

    fn is_stable(&self) -> bool {
        true
    }

    fn sort<S, F>(&self, sequence: &mut S, compare: &mut F) -> SortResult<()>
        where S: Sequence,
              F: FnMut(&S::Item, &S::Item) -> SortResult<Ordering> {
        if sequence.len() < 2 {
            return Ok(());
        }
        let mut aux = sequence.auxiliary()?;
        let high = sequence.len() - 1;
        merge_sort(sequence, &mut aux, 0, high, compare)
    }
}

fn merge_sort<S, F>(sequence: &mut S, aux: &mut S, low: usize, high: usize, compare: &mut F) -> SortResult<()>
    where S: Sequence,
          F: FnMut(&S::Item, &S::Item) -> SortResult<Ordering> {
    if low >= high {
        return Ok(());
    }
    let mid = low + (high - low) / 2;
    merge_sort(sequence, aux, low, mid, compare)?;
    merge_sort(sequence, aux, mid + 1, high, compare)?;
    if compare(&sequence.get(mid)?, &sequence.get(mid + 1)?)? != Ordering::Greater {
        return Ok(());
    }
    merge(sequence, aux, low, mid, high, compare)
}

fn merge<S, F>(sequence: &mut S, aux: &mut S, low: usize, mid: usize, high: usize, compare: &mut F) -> SortResult<()>
    where S: Sequence,
          F: FnMut(&S::Item, &S::Item) -> SortResult<Ordering> {
    for k in low..=high {
        aux.set(k, sequence.get(k)?)?;
    }

    let mut i = low;
    let mut j = mid + 1;
    for k in low..=high {
        let item = if i > mid {
            j += 1;
            aux.get(j - 1)?
        } else if j > high {
            i += 1;
            aux.get(i - 1)?
        } else {
            let left = aux.get(i)?;
            let right = aux.get(j)?;
            // take from the right run only when strictly smaller
            if compare(&right, &left)? == Ordering::Less {
                j += 1;
                right
            } else {
                i += 1;
                left
            }
        };
        sequence.set(k, item)?;
    }
    Ok(())
}
