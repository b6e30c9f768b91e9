//! Bounded binary search over slices that are already sorted by `compare`.

use std::cmp::Ordering;

/// Index of the first element that does not compare less than `value`.
///
/// Returns `xs.len()` when every element is less, and `0` for an empty slice.
pub fn lower_bound<T, V, F>(xs: &[T], value: &V, compare: F) -> usize
where
    F: Fn(&T, &V) -> Ordering,
{
    bound(xs, value, compare, |ord| ord == Ordering::Less)
}

/// Index of the first element that compares greater than `value`.
pub fn upper_bound<T, V, F>(xs: &[T], value: &V, compare: F) -> usize
where
    F: Fn(&T, &V) -> Ordering,
{
    bound(xs, value, compare, |ord| ord != Ordering::Greater)
}

fn bound<T, V, F, G>(xs: &[T], value: &V, compare: F, go_right: G) -> usize
where
    F: Fn(&T, &V) -> Ordering,
    G: Fn(Ordering) -> bool,
{
    let mut lo = 0;
    let mut hi = xs.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if go_right(compare(&xs[mid], value)) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
