//! Binary-search helpers for sorted slices and tiered lookup tables.
//!
//! All helpers are pure and run in `O(log n)` (except [`min_index`], which is a
//! linear scan).

/// Insertion index in an ascending slice. On ties, returns the left-most position.
pub fn insertion_index_asc<T, K: PartialOrd>(
    items: &[T],
    target: &K,
    key: impl Fn(&T) -> K,
) -> usize {
    items.partition_point(|item| key(item) < *target)
}

/// Insertion index in a descending slice. On ties, returns the left-most position.
pub fn insertion_index_desc<T, K: PartialOrd>(
    items: &[T],
    target: &K,
    key: impl Fn(&T) -> K,
) -> usize {
    items.partition_point(|item| key(item) > *target)
}

/// Treats an ascending slice as region starts `[k0, k1), [k1, k2), ...` and returns the
/// index of the region containing `value`, i.e. the last element whose key is `<= value`.
///
/// Returns `None` when `value` is below the first region.
///
/// ```
/// use ratinglog::order::last_region_start;
///
/// let keys = [10, 20, 30];
/// assert_eq!(last_region_start(&keys, &5, |k| *k), None);
/// assert_eq!(last_region_start(&keys, &10, |k| *k), Some(0));
/// assert_eq!(last_region_start(&keys, &25, |k| *k), Some(1));
/// assert_eq!(last_region_start(&keys, &35, |k| *k), Some(2));
/// ```
pub fn last_region_start<T, K: PartialOrd>(
    items: &[T],
    value: &K,
    key: impl Fn(&T) -> K,
) -> Option<usize> {
    items.partition_point(|item| key(item) <= *value).checked_sub(1)
}

/// Returns the region element containing `value`, see [`last_region_start`].
pub fn region<'a, T, K: PartialOrd>(
    items: &'a [T],
    value: &K,
    key: impl Fn(&T) -> K,
) -> Option<&'a T> {
    last_region_start(items, value, key).map(|idx| &items[idx])
}

/// Index of the first minimum, or `None` for an empty slice.
pub fn min_index<T: PartialOrd>(items: &[T]) -> Option<usize> {
    items.iter().enumerate().fold(None, |best, (idx, item)| match best {
        Some(b) if items[b] <= *item => Some(b),
        _ => Some(idx),
    })
}
