//! Leftmost-insertion binary search over ascending slices.
//!
//! Two entry points: comparing by raw value, and comparing via a key
//! extracted from each element. Both return the smallest index whose
//! element (or key) is `>=` the probe value, so duplicates resolve to
//! their first occurrence. Used to convert a time-range endpoint into a
//! sample index; the sample times are sorted ascending, which every
//! caller depends on.

use crate::utils::error::RangeError;

/// Find the leftmost insertion point for `x` in the whole of `values`.
///
/// **Public** - range conversion entry point for columnar time columns
///
/// Returns the smallest index `i` such that `x <= values[i]`, or
/// `values.len()` if `x` is greater than every element. O(log n).
pub fn bisection_left<T: PartialOrd>(values: &[T], x: &T) -> usize {
    // Full-slice bounds are always valid.
    let mut low = 0;
    let mut high = values.len();

    while low < high {
        let mid = (low + high) / 2;
        if *x <= values[mid] {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    low
}

/// Leftmost insertion point for `x` restricted to `[low, high)`.
///
/// # Errors
/// Returns [`RangeError`] if `low` or `high` lie outside `[0, values.len()]`.
pub fn bisection_left_between<T: PartialOrd>(
    values: &[T],
    x: &T,
    low: usize,
    high: usize,
) -> Result<usize, RangeError> {
    check_bounds(values.len(), low, high)?;

    let mut low = low;
    let mut high = high;
    while low < high {
        let mid = (low + high) / 2;
        if *x <= values[mid] {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    Ok(low)
}

/// Find the leftmost insertion point for `x`, comparing extracted keys.
///
/// **Public** - range conversion entry point for struct-of-arrays samples
///
/// `key` must be monotonic over `values` (the slice is ascending by the
/// extracted key). Returns `values.len()` if `x` is greater than every key.
pub fn bisection_left_by_key<T, K, F>(values: &[T], key: F, x: &K) -> usize
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut low = 0;
    let mut high = values.len();

    while low < high {
        let mid = (low + high) / 2;
        if *x <= key(&values[mid]) {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    low
}

/// Key-extracting variant of [`bisection_left_between`].
///
/// # Errors
/// Returns [`RangeError`] if `low` or `high` lie outside `[0, values.len()]`.
pub fn bisection_left_by_key_between<T, K, F>(
    values: &[T],
    key: F,
    x: &K,
    low: usize,
    high: usize,
) -> Result<usize, RangeError>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    check_bounds(values.len(), low, high)?;

    let mut low = low;
    let mut high = high;
    while low < high {
        let mid = (low + high) / 2;
        if *x <= key(&values[mid]) {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    Ok(low)
}

/// Validate search bounds against the slice length
///
/// **Private** - shared by the `_between` variants
fn check_bounds(len: usize, low: usize, high: usize) -> Result<(), RangeError> {
    if low > len || high > len {
        return Err(RangeError { low, high, len });
    }
    Ok(())
}
