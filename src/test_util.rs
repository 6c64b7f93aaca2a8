// src/test_util.rs

use crate::Candle;
use std::num::NonZero;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e): (f64, f64) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

/// Asserts that `actual` rounds to `expected` at the given number of
/// decimals, the way published reference tables are printed.
macro_rules! assert_rounded {
    ($actual:expr, $expected:expr, $decimals:expr) => {{
        let (a, e): (f64, f64) = ($actual, $expected);
        let tolerance = 0.5 * 10f64.powi(-($decimals)) + 1e-9;
        assert!(
            (a - e).abs() <= tolerance,
            "assert_rounded failed: actual={a}, expected={e} at {} decimals",
            $decimals,
        );
    }};
}

pub(crate) use assert_approx;
pub(crate) use assert_rounded;

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap()
}

/// Candle with high, low and close; open equals close, no volume.
pub fn hlc(high: f64, low: f64, close: f64) -> Candle {
    Candle::hlc(high, low, close)
}

/// Candle where every price equals `close`.
pub fn flat(close: f64, volume: f64) -> Candle {
    Candle::new(close, close, close, close, volume)
}

// Tulip Indicators reference series (tests/atoz.txt).
pub const PRICES: [f64; 15] = [
    81.59, 81.06, 82.87, 83.0, 83.61, 83.15, 82.84, 83.99, 84.55, 84.36, 85.53, 86.54, 86.89,
    87.77, 87.29,
];

pub const HIGHS: [f64; 15] = [
    82.15, 81.89, 83.03, 83.3, 83.85, 83.9, 83.33, 84.3, 84.84, 85.0, 85.9, 86.58, 86.98, 88.0,
    87.87,
];

pub const LOWS: [f64; 15] = [
    81.29, 80.64, 81.31, 82.65, 83.07, 83.11, 82.49, 82.3, 84.15, 84.11, 84.03, 85.39, 85.76,
    87.17, 87.01,
];

/// The reference series as candles.
pub fn candles() -> Vec<Candle> {
    (0..PRICES.len())
        .map(|i| hlc(HIGHS[i], LOWS[i], PRICES[i]))
        .collect()
}
