//! Stateless numeric primitives over fixed-size collections.
//!
//! Empty inputs never panic: averages and deviations return zero, extrema
//! return `None`.

use crate::Num;

/// Direction of a run of consecutive values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Streak {
    Up,
    Down,
}

/// Arithmetic mean.
#[must_use]
pub fn average<N: Num>(values: &[N]) -> N {
    if values.is_empty() {
        return N::ZERO;
    }

    values.iter().copied().sum::<N>() / N::from_usize(values.len())
}

/// Population standard deviation.
#[must_use]
pub fn standard_deviation<N: Num>(values: &[N]) -> N {
    if values.is_empty() {
        return N::ZERO;
    }

    let mean = average(values);
    let variance = values
        .iter()
        .map(|&v| (v - mean) * (v - mean))
        .sum::<N>()
        / N::from_usize(values.len());

    variance.sqrt()
}

/// Mean absolute deviation from the mean.
#[must_use]
pub fn mean_absolute_deviation<N: Num>(values: &[N]) -> N {
    if values.is_empty() {
        return N::ZERO;
    }

    let mean = average(values);
    values.iter().map(|&v| (v - mean).abs()).sum::<N>() / N::from_usize(values.len())
}

#[must_use]
pub fn maximum<N: Num>(values: &[N]) -> Option<N> {
    values.iter().copied().reduce(N::max)
}

#[must_use]
pub fn minimum<N: Num>(values: &[N]) -> Option<N> {
    values.iter().copied().reduce(N::min)
}

/// Median (mean of the two middle values for even lengths).
#[must_use]
pub fn median<N: Num>(values: &[N]) -> N {
    median_of_sorted(&sorted(values))
}

/// Quartile by linear interpolation between closest ranks, with the rank at
/// `(n - 1) × q`.
///
/// `q` is clamped to `[0, 1]`.
#[must_use]
pub fn quartile_interpolated<N: Num>(values: &[N], q: N) -> N {
    let sorted = sorted(values);
    let Some(last) = sorted.len().checked_sub(1) else {
        return N::ZERO;
    };

    let q = q.max(N::ZERO).min(N::ONE);
    let position = N::from_usize(last) * q;

    let mut lower = 0;
    while lower < last && N::from_usize(lower + 1) <= position {
        lower += 1;
    }

    let fraction = position - N::from_usize(lower);
    match sorted.get(lower + 1) {
        Some(&upper) => sorted[lower] + (upper - sorted[lower]) * fraction,
        None => sorted[lower],
    }
}

/// Quartiles by the split-half (Tukey) method.
///
/// Q1 and Q3 are the medians of the lower and upper halves; for odd lengths
/// the overall median belongs to neither half. Returns `(q1, q2, q3)`.
#[must_use]
pub fn quartiles_split_half<N: Num>(values: &[N]) -> (N, N, N) {
    let sorted = sorted(values);
    let half = sorted.len() / 2;

    let lower = &sorted[..half];
    let upper = &sorted[sorted.len() - half..];

    if lower.is_empty() {
        let only = median_of_sorted(&sorted);
        return (only, only, only);
    }

    (
        median_of_sorted(lower),
        median_of_sorted(&sorted),
        median_of_sorted(upper),
    )
}

/// Lengths of all runs of strictly rising (or falling) consecutive values.
///
/// ```
/// use streamta::stats::{Streak, streaks};
///
/// assert_eq!(streaks(&[1.0, 2.0, 3.0, 2.0, 3.0], Streak::Up), vec![2, 1]);
/// ```
#[must_use]
pub fn streaks<N: Num>(values: &[N], direction: Streak) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut length = 0;

    for pair in values.windows(2) {
        let continues = match direction {
            Streak::Up => pair[1] > pair[0],
            Streak::Down => pair[1] < pair[0],
        };

        if continues {
            length += 1;
        } else if length > 0 {
            runs.push(length);
            length = 0;
        }
    }

    if length > 0 {
        runs.push(length);
    }

    runs
}

fn sorted<N: Num>(values: &[N]) -> Vec<N> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

fn median_of_sorted<N: Num>(sorted: &[N]) -> N {
    let mid = sorted.len() / 2;

    match sorted.len() {
        0 => N::ZERO,
        len if len.is_multiple_of(2) => (sorted[mid - 1] + sorted[mid]) / (N::ONE + N::ONE),
        _ => sorted[mid],
    }
}
