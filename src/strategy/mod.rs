//! Comparison sorts over any random access [Sequence].
//!
//! The same four algorithms sort in-memory rows and the disk-resident line index. Every
//! accessor and the comparator are fallible so that a disk backed sequence can surface I/O
//! failures, which abort the sort.

use std::cmp::Ordering;

use crate::error::SortResult;

pub mod bubble_sort;
pub mod merge_sort;
pub mod quick_sort;
pub mod selection_sort;

use bubble_sort::BubbleSort;
use merge_sort::MergeSort;
use quick_sort::QuickSort;
use selection_sort::SelectionSort;

/// An indexable sequence with in-place element replacement
pub trait Sequence {
    type Item: Clone;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&mut self, i: usize) -> SortResult<Self::Item>;

    fn set(&mut self, i: usize, item: Self::Item) -> SortResult<()>;

    fn swap(&mut self, i: usize, j: usize) -> SortResult<()> {
        if i == j {
            return Ok(());
        }
        let a = self.get(i)?;
        let b = self.get(j)?;
        self.set(i, b)?;
        self.set(j, a)
    }

    /// Create a scratch sequence of the same length, used by merge sort
    fn auxiliary(&mut self) -> SortResult<Self> where Self: Sized;
}

impl<T: Clone> Sequence for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&mut self, i: usize) -> SortResult<T> {
        Ok(self[i].clone())
    }

    fn set(&mut self, i: usize, item: T) -> SortResult<()> {
        self[i] = item;
        Ok(())
    }

    fn swap(&mut self, i: usize, j: usize) -> SortResult<()> {
        self.as_mut_slice().swap(i, j);
        Ok(())
    }

    fn auxiliary(&mut self) -> SortResult<Self> {
        Ok(self.clone())
    }
}

/// A comparison sort that mutates a [Sequence] in place
pub trait SortStrategy {
    fn name(&self) -> &'static str;

    /// Whether elements the comparator reports as equal keep their relative order
    fn is_stable(&self) -> bool;

    fn sort<S, F>(&self, sequence: &mut S, compare: &mut F) -> SortResult<()>
        where S: Sequence,
              F: FnMut(&S::Item, &S::Item) -> SortResult<Ordering>;
}

/// Selects one of the [SortStrategy] implementations by name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Hoare partition around the middle element. Not stable, O(n²) worst case
    QuickSort,
    /// Top-down merge sort. Stable, O(n log n) worst case
    #[default]
    MergeSort,
    /// Stable, O(n²)
    BubbleSort,
    /// Not stable, O(n²)
    SelectionSort,
}

impl Algorithm {
    /// Resolve an algorithm by name ignoring case, blanks, `-` and `_`.
    ///
    /// Unrecognized names fall back to [Algorithm::MergeSort], the only strategy that is both
    /// stable and O(n log n).
    pub fn from_name(name: &str) -> Algorithm {
        let normalized: String = name.chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "quicksort" | "quick" => { Algorithm::QuickSort }
            "mergesort" | "merge" => { Algorithm::MergeSort }
            "bubblesort" | "bubble" => { Algorithm::BubbleSort }
            "selectionsort" | "selection" => { Algorithm::SelectionSort }
            _ => {
                log::warn!("Unknown sort algorithm '{}', using {}", name, Algorithm::MergeSort.name());
                Algorithm::MergeSort
            }
        }
    }

    pub fn all() -> [Algorithm; 4] {
        [Algorithm::QuickSort, Algorithm::MergeSort, Algorithm::BubbleSort, Algorithm::SelectionSort]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::QuickSort => { QuickSort.name() }
            Algorithm::MergeSort => { MergeSort.name() }
            Algorithm::BubbleSort => { BubbleSort.name() }
            Algorithm::SelectionSort => { SelectionSort.name() }
        }
    }

    pub fn is_stable(&self) -> bool {
        match self {
            Algorithm::QuickSort => { QuickSort.is_stable() }
            Algorithm::MergeSort => { MergeSort.is_stable() }
            Algorithm::BubbleSort => { BubbleSort.is_stable() }
            Algorithm::SelectionSort => { SelectionSort.is_stable() }
        }
    }

    pub fn sort<S, F>(&self, sequence: &mut S, compare: &mut F) -> SortResult<()>
        where S: Sequence,
              F: FnMut(&S::Item, &S::Item) -> SortResult<Ordering> {
        match self {
            Algorithm::QuickSort => { QuickSort.sort(sequence, compare) }
            Algorithm::MergeSort => { MergeSort.sort(sequence, compare) }
            Algorithm::BubbleSort => { BubbleSort.sort(sequence, compare) }
            Algorithm::SelectionSort => { SelectionSort.sort(sequence, compare) }
        }
    }

    /// Sort a vector with an infallible comparator
    pub fn sort_by<T, F>(&self, items: &mut Vec<T>, mut compare: F) -> SortResult<()>
        where T: Clone,
              F: FnMut(&T, &T) -> Ordering {
        self.sort(items, &mut |a: &T, b: &T| Ok(compare(a, b)))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use std::io;

    use rand::Rng;

    use crate::error::SortError;
    use crate::strategy::Algorithm;

    fn random_items(n: usize, range: u32) -> Vec<(u32, usize)> {
        let mut rng = rand::thread_rng();
        (0..n).map(|i| (rng.gen_range(0..range), i)).collect()
    }

    #[test]
    fn test_all_algorithms_sort() -> Result<(), anyhow::Error> {
        for algorithm in Algorithm::all() {
            for n in [0, 1, 2, 3, 17, 200] {
                let mut items = random_items(n, 10);
                let mut expected = items.clone();
                expected.sort_by_key(|item| item.0);
                algorithm.sort_by(&mut items, |a, b| a.0.cmp(&b.0))?;
                let keys: Vec<u32> = items.iter().map(|item| item.0).collect();
                let expected_keys: Vec<u32> = expected.iter().map(|item| item.0).collect();
                assert_eq!(keys, expected_keys, "{}", algorithm.name());

                let mut positions: Vec<usize> = items.iter().map(|item| item.1).collect();
                positions.sort();
                assert_eq!(positions, (0..n).collect::<Vec<usize>>(), "{}", algorithm.name());
            }
        }
        Ok(())
    }

    #[test]
    fn test_stable_algorithms_keep_tie_order() -> Result<(), anyhow::Error> {
        for algorithm in Algorithm::all().into_iter().filter(|a| a.is_stable()) {
            let mut items = random_items(300, 5);
            let mut expected = items.clone();
            expected.sort_by_key(|item| item.0);
            algorithm.sort_by(&mut items, |a, b| a.0.cmp(&b.0))?;
            assert_eq!(items, expected, "{}", algorithm.name());
        }
        Ok(())
    }

    #[test]
    fn test_selection_sort_is_unstable() -> Result<(), anyhow::Error> {
        assert!(!Algorithm::SelectionSort.is_stable());
        assert!(!Algorithm::QuickSort.is_stable());
        let mut items = vec![(2, 'a'), (2, 'b'), (1, 'c')];
        Algorithm::SelectionSort.sort_by(&mut items, |a, b| a.0.cmp(&b.0))?;
        assert_eq!(items, vec![(1, 'c'), (2, 'b'), (2, 'a')]);
        Ok(())
    }

    #[test]
    fn test_already_sorted_and_reversed() -> Result<(), anyhow::Error> {
        for algorithm in Algorithm::all() {
            let mut ascending: Vec<u32> = (0..100).collect();
            algorithm.sort_by(&mut ascending, |a, b| a.cmp(b))?;
            assert_eq!(ascending, (0..100).collect::<Vec<u32>>());

            let mut descending: Vec<u32> = (0..100).rev().collect();
            algorithm.sort_by(&mut descending, |a, b| a.cmp(b))?;
            assert_eq!(descending, (0..100).collect::<Vec<u32>>());
        }
        Ok(())
    }

    #[test]
    fn test_comparator_error_aborts() {
        for algorithm in Algorithm::all() {
            let mut items = vec![3, 1, 2];
            let result = algorithm.sort(
                &mut items,
                &mut |_a: &i32, _b: &i32| -> Result<Ordering, SortError> {
                    Err(SortError::Io(io::Error::new(io::ErrorKind::Other, "boom")))
                },
            );
            assert!(matches!(result, Err(SortError::Io(_))), "{}", algorithm.name());
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Algorithm::from_name("QuickSort"), Algorithm::QuickSort);
        assert_eq!(Algorithm::from_name("bubble-sort"), Algorithm::BubbleSort);
        assert_eq!(Algorithm::from_name("selection_sort"), Algorithm::SelectionSort);
        assert_eq!(Algorithm::from_name("mergesort"), Algorithm::MergeSort);
        assert_eq!(Algorithm::from_name("timsort"), Algorithm::MergeSort);
    }
}
