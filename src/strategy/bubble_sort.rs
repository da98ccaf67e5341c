use std::cmp::Ordering;

use crate::error::SortResult;
use crate::strategy::{Sequence, SortStrategy};

/// Adjacent swap passes, each pass settles the last element of the unsorted prefix.
/// Stops after a pass without swaps. Stable, O(n²).
#[derive(Clone, Copy, Debug, Default)]
pub struct BubbleSort;

impl SortStrategy for BubbleSort {
    fn name(&self) -> &'static str {
        "BubbleSort"
    }

    fn is_stable(&self) -> bool {
        true
    }

    fn sort<S, F>(&self, sequence: &mut S, compare: &mut F) -> SortResult<()>
        where S: Sequence,
              F: FnMut(&S::Item, &S::Item) -> SortResult<Ordering> {
        let mut end = sequence.len();
        while end > 1 {
            let mut swapped = false;
            for i in 1..end {
                let previous = sequence.get(i - 1)?;
                let current = sequence.get(i)?;
                if compare(&previous, &current)? == Ordering::Greater {
                    sequence.set(i - 1, current)?;
                    sequence.set(i, previous)?;
                    swapped = true;
                }
            }
            if !swapped {
                break;
            }
            end -= 1;
        }
        Ok(())
    }
}
