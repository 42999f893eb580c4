//! Sorting of the top level of the record set

use std::cmp::Ordering;

use crate::column::{ColumnLayout, SortDirection};
use crate::record::Record;
use crate::value::Value;

/// Threshold for sorting the halves in parallel
const PARALLEL_THRESHOLD: usize = 10_000;

/// Below this length a run is insertion sorted
const INSERTION_THRESHOLD: usize = 16;

/// The single active sort rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorter {
    pub field: String,
    pub direction: SortDirection,
}

impl Sorter {
    pub fn new(field: &str, direction: SortDirection) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }
}

/// Sort records in place by the active rule. Only the top level moves,
/// children keep their order. Nothing happens if the rule names no column.
pub fn sort_records(records: &mut Vec<Record>, sorter: Option<&Sorter>, layout: &ColumnLayout) {
    let Some(sorter) = sorter else {
        return;
    };
    let Some(column) = layout.column(&sorter.field) else {
        return;
    };
    let comparator = column.sortable.as_ref().and_then(|s| s.sorter.as_ref());

    let permutation = sorted_indices(records, |a, b| {
        let (va, vb) = (a.get(&sorter.field), b.get(&sorter.field));
        let result = match comparator {
            Some(cmp) => cmp(va, vb),
            None => Value::default_compare(va, vb),
        };
        match sorter.direction {
            SortDirection::Ascend => result,
            SortDirection::Descend => result.reverse(),
        }
    });

    apply_permutation(records, &permutation);
}

/// Stable sort returning the permutation of indices.
/// Only `Greater` moves an element, so comparators without an equal
/// branch or without a consistent total order are still accepted.
pub fn sorted_indices<F>(records: &[Record], cmp: F) -> Vec<usize>
where
    F: Fn(&Record, &Record) -> Ordering + Sync,
{
    let mut indices: Vec<usize> = (0..records.len()).collect();
    let mut buf = indices.clone();
    let by_index = |a: usize, b: usize| cmp(&records[a], &records[b]);
    merge_sort(&mut indices, &mut buf, &by_index);
    indices
}

fn merge_sort<F>(v: &mut [usize], buf: &mut [usize], cmp: &F)
where
    F: Fn(usize, usize) -> Ordering + Sync,
{
    let len = v.len();
    if len <= INSERTION_THRESHOLD {
        insertion_sort(v, cmp);
        return;
    }

    let mid = len / 2;
    {
        let (left, right) = v.split_at_mut(mid);
        let (left_buf, right_buf) = buf.split_at_mut(mid);
        if len >= PARALLEL_THRESHOLD {
            rayon::join(
                || merge_sort(left, left_buf, cmp),
                || merge_sort(right, right_buf, cmp),
            );
        } else {
            merge_sort(left, left_buf, cmp);
            merge_sort(right, right_buf, cmp);
        }
    }

    buf.copy_from_slice(v);
    let (left, right) = buf.split_at(mid);
    let (mut i, mut j) = (0, 0);
    for slot in v.iter_mut() {
        let take_right = i >= left.len()
            || (j < right.len() && cmp(left[i], right[j]) == Ordering::Greater);
        if take_right {
            *slot = right[j];
            j += 1;
        } else {
            *slot = left[i];
            i += 1;
        }
    }
}

fn insertion_sort<F>(v: &mut [usize], cmp: &F)
where
    F: Fn(usize, usize) -> Ordering,
{
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && cmp(v[j - 1], v[j]) == Ordering::Greater {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn apply_permutation(records: &mut Vec<Record>, permutation: &[usize]) {
    let mut slots: Vec<Option<Record>> = records.drain(..).map(Some).collect();
    records.extend(permutation.iter().filter_map(|&i| slots[i].take()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(values: &[i32]) -> Vec<Record> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Record::new(i.to_string()).with("n", *v))
            .collect()
    }

    fn by_n(a: &Record, b: &Record) -> Ordering {
        Value::default_compare(a.get("n"), b.get("n"))
    }

    #[test]
    fn small_input_is_stable() {
        let records = numbered(&[3, 1, 2, 1, 3]);
        assert_eq!(sorted_indices(&records, by_n), vec![1, 3, 2, 0, 4]);
    }

    #[test]
    fn merge_path_is_stable() {
        let values: Vec<i32> = (0..200).map(|i| (i * 7) % 5).collect();
        let records = numbered(&values);
        let indices = sorted_indices(&records, by_n);

        for pair in indices.windows(2) {
            let (a, b) = (values[pair[0]], values[pair[1]]);
            assert!(a < b || (a == b && pair[0] < pair[1]));
        }
    }

    #[test]
    fn parallel_path_matches_sequential_order() {
        let values: Vec<i32> = (0..(PARALLEL_THRESHOLD as i32 + 500)).map(|i| (i * 31) % 97).collect();
        let records = numbered(&values);
        let indices = sorted_indices(&records, by_n);

        let mut expected: Vec<usize> = (0..values.len()).collect();
        expected.sort_by_key(|&i| values[i]);
        assert_eq!(indices, expected);
    }

    #[test]
    fn inconsistent_comparator_does_not_panic() {
        let records = numbered(&[5, 4, 3, 2, 1, 0, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 9, 8, 7, 6]);
        let indices = sorted_indices(&records, |_, _| Ordering::Greater);
        assert_eq!(indices.len(), records.len());
    }
}
