use std::cmp::Ordering;

use crate::error::SortResult;
use crate::strategy::{Sequence, SortStrategy};

/// Repeatedly swaps the minimum of the unsorted suffix into place.
///
/// One swap per pass, O(n²) comparisons. Not stable: the swap can move an element past
/// others equal to it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectionSort;

impl SortStrategy for SelectionSort {
    fn name(&self) -> &'static str {
        "SelectionSort"
    }

    fn is_stable(&self) -> bool {
        false
    }

    fn sort<S, F>(&self, sequence: &mut S, compare: &mut F) -> SortResult<()>
        where S: Sequence,
              F: FnMut(&S::Item, &S::Item) -> SortResult<Ordering> {
        let n = sequence.len();
        for i in 0..n.saturating_sub(1) {
            let mut min_index = i;
            let mut min = sequence.get(i)?;
            for j in i + 1..n {
                let current = sequence.get(j)?;
                if compare(&current, &min)? == Ordering::Less {
                    min_index = j;
                    min = current;
                }
            }
            if min_index != i {
                sequence.swap(i, min_index)?;
            }
        }
        Ok(())
    }
}
