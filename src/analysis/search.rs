//! Tolerance-bounded neighbor lookup in a sorted timestamp array.

/// Indices around a probe value that fall within tolerance.
///
/// `mid` is an exact match; `low` and `high` are the nearest indices below
/// and above it (or around the insertion point when there is no exact
/// match). Any slot whose value is farther than the tolerance is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Nearest index before the probe within tolerance.
    pub low: Option<usize>,
    /// Index of an exact match.
    pub mid: Option<usize>,
    /// Nearest index after the probe within tolerance.
    pub high: Option<usize>,
}

impl Neighbors {
    /// Whether no slot matched.
    pub fn is_empty(&self) -> bool {
        self.low.is_none() && self.mid.is_none() && self.high.is_none()
    }
}

/// Find the neighbors of `x` in ascending `arr` within `epsilon`.
///
/// Runs in `O(log n)`. Slots that would fall off either end of the array
/// are `None` rather than an error.
#[allow(clippy::float_cmp)]
pub fn search(arr: &[f64], x: f64, epsilon: f64) -> Neighbors {
    let pos = arr.partition_point(|&v| v < x);
    let within = |i: usize| (arr[i] - x).abs() <= epsilon;

    let (mid, after) = if arr.get(pos) == Some(&x) {
        (Some(pos), pos + 1)
    } else {
        (None, pos)
    };

    let low = pos.checked_sub(1).filter(|&i| within(i));
    let high = Some(after).filter(|&i| i < arr.len() && within(i));

    Neighbors { low, mid, high }
}
