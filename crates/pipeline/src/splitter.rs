//! Range splitting for fan-out.
//!
//! The candidate set is cut into one contiguous range per worker. Ranges are
//! half-open, ascending and cover `[0, n)` exactly once; when `n` is not a
//! multiple of `k` the first `n % k` ranges are one element longer.

use std::ops::Range;

/// Split `n` items into `k` near-equal contiguous ranges.
///
/// Returns exactly `k` ranges. When `k > n` the trailing ranges are empty;
/// callers still dispatch them. `k == 0` yields no ranges.
pub fn split_ranges(n: usize, k: usize) -> Vec<Range<usize>> {
    if k == 0 {
        return Vec::new();
    }

    let base = n / k;
    let remainder = n % k;

    let mut ranges = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let len = base + usize::from(i < remainder);
        ranges.push(start..start + len);
        start += len;
    }
    debug_assert_eq!(start, n);
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uneven_split_front_loads_remainder() {
        let ranges = split_ranges(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn test_even_split() {
        assert_eq!(split_ranges(9, 3), vec![0..3, 3..6, 6..9]);
        assert_eq!(split_ranges(5, 1), vec![0..5]);
    }

    #[test]
    fn test_more_workers_than_items() {
        let ranges = split_ranges(2, 4);
        assert_eq!(ranges, vec![0..1, 1..2, 2..2, 2..2]);
    }

    #[test]
    fn test_empty_input() {
        let ranges = split_ranges(0, 3);
        assert_eq!(ranges.len(), 3);
        assert!(ranges.iter().all(|r| r.is_empty()));
        assert!(split_ranges(7, 0).is_empty());
    }

    #[test]
    fn test_partition_holds_for_all_small_sizes() {
        for n in 0..64 {
            for k in 1..10 {
                let ranges = split_ranges(n, k);
                assert_eq!(ranges.len(), k);

                // Contiguous cover of [0, n) with no overlap
                let mut expected_start = 0;
                for r in &ranges {
                    assert_eq!(r.start, expected_start, "gap or overlap at n={n} k={k}");
                    expected_start = r.end;
                }
                assert_eq!(expected_start, n);

                let longest = ranges.iter().map(|r| r.len()).max().unwrap();
                let shortest = ranges.iter().map(|r| r.len()).min().unwrap();
                assert!(longest - shortest <= 1, "unbalanced at n={n} k={k}");
            }
        }
    }
}
