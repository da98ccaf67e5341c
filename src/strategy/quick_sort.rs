use std::cmp::Ordering;

use crate::error::SortResult;
use crate::strategy::{Sequence, SortStrategy};

/// Hoare style quicksort, the pivot is the middle element of the current range.
///
/// Not stable. Degrades to O(n²) on adversarial inputs. Recursion goes into the smaller
/// partition only, keeping the stack depth logarithmic.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuickSort;

impl SortStrategy for QuickSort {
    fn name(&self) -> &'static str {
        "QuickSort"
    }

    fn is_stable(&self) -> bool {
        false
    }

    fn sort<S, F>(&self, sequence: &mut S, compare: &mut F) -> SortResult<()>
        where S: Sequence,
              F: FnMut(&S::Item, &S::Item) -> SortResult<Ordering> {
        if sequence.len() < 2 {
            return Ok(());
        }
        let high = sequence.len() as isize - 1;
        quick_sort(sequence, 0, high, compare)
    }
}

fn quick_sort<S, F>(sequence: &mut S, mut low: isize, mut high: isize, compare: &mut F) -> SortResult<()>
    where S: Sequence,
          F: FnMut(&S::Item, &S::Item) -> SortResult<Ordering> {
    while low < high {
        let pivot = sequence.get((low + (high - low) / 2) as usize)?;
        let mut i = low;
        let mut j = high;
        while i <= j {
            while compare(&sequence.get(i as usize)?, &pivot)? == Ordering::Less {
                i += 1;
            }
            while compare(&sequence.get(j as usize)?, &pivot)? == Ordering::Greater {
                j -= 1;
            }
            if i <= j {
                sequence.swap(i as usize, j as usize)?;
                i += 1;
                j -= 1;
            }
        }

        if j - low < high - i {
            quick_sort(sequence, low, j, compare)?;
            low = i;
        } else {
            quick_sort(sequence, i, high, compare)?;
            high = j;
        }
    }
    Ok(())
}
