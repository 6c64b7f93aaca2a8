#![allow(dead_code)]

use serde::{Deserialize, de::DeserializeOwned};
use streamta::{Candle, Num};

const DATA_DIR: &str = "tests/fixtures/data";

/// OHLCV bar as stored in the fixture CSVs.
///
/// Prices stay strings so both tracks parse them exactly.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub index: usize,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl RefBar {
    pub fn candle<N: Num>(&self) -> Candle<N> {
        Candle::parse(&self.open, &self.high, &self.low, &self.close, &self.volume)
            .unwrap_or_else(|e| panic!("invalid bar {}: {e}", self.index))
    }
}

/// High / low pair, for data sets published without open and close.
#[derive(Debug, Clone, Deserialize)]
pub struct RefRange {
    pub index: usize,
    pub high: f64,
    pub low: f64,
}

impl RefRange {
    pub fn candle(&self) -> Candle {
        Candle::hlc(self.high, self.low, self.high.midpoint(self.low))
    }
}

/// Reference value at a bar index.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub index: usize,
    pub expected: f64,
}

/// Reference lower and middle Bollinger band.
#[derive(Debug, Deserialize)]
pub struct RefBands {
    pub index: usize,
    pub lower: f64,
    pub middle: f64,
}

/// Reference stochastic %K and %D.
#[derive(Debug, Deserialize)]
pub struct RefStoch {
    pub index: usize,
    pub k: f64,
    pub d: f64,
}

/// The 15 bar Tulip Indicators sample (`tests/atoz.txt`).
pub fn tulip_candles() -> Vec<Candle> {
    load_records::<RefBar>("tulip-candles.csv")
        .iter()
        .map(RefBar::candle)
        .collect()
}

/// 400 bar seeded random walk, used where only consistency is checked.
pub fn random_walk<N: Num>() -> Vec<Candle<N>> {
    load_records::<RefBar>("random-walk.csv")
        .iter()
        .map(RefBar::candle)
        .collect()
}

pub fn load_ref_values(name: &str) -> Vec<RefValue> {
    load_records(name)
}

pub fn load_records<D>(name: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let path = format!("{DATA_DIR}/{name}");
    let mut rdr =
        csv::Reader::from_path(&path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize()
        .enumerate()
        .map(|(row, record)| record.unwrap_or_else(|e| panic!("{path} row {row}: {e}")))
        .collect()
}

/// Tolerance of a value printed with `decimals` places.
pub fn rounding_tolerance(decimals: i32) -> f64 {
    0.5 * 10f64.powi(-decimals) + 1e-9
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Checks a result series against reference values: `None` before the
/// first reference index, matching values from there on.
pub fn assert_series(name: &str, results: &[Option<f64>], reference: &[RefValue], decimals: i32) {
    let first = reference.first().map_or(results.len(), |r| r.index);
    for (i, result) in results[..first].iter().enumerate() {
        assert!(result.is_none(), "{name} produced {result:?} during warm-up at bar {i}");
    }

    for row in reference {
        let value = results[row.index]
            .unwrap_or_else(|| panic!("{name} returned None at bar {}", row.index));
        assert_near(
            value,
            row.expected,
            rounding_tolerance(decimals),
            &format!("{name} at bar {}", row.index),
        );
    }
}

/// Creates the ticks of a bar as a live feed delivers them.
///
/// The first tick opens the bar with a close near the open, the second
/// covers half of the final move and the third is the closed bar.
pub fn repaint_sequence(bar: &Candle) -> [Candle; 3] {
    let open = bar.open;
    [
        Candle::new(
            open,
            open * 1.001,
            open * 0.999,
            open * 1.0005,
            (bar.volume - 2.0).max(0.0),
        ),
        Candle::new(
            open,
            open.midpoint(bar.high),
            open.midpoint(bar.low),
            open.midpoint(bar.close),
            (bar.volume - 1.0).max(0.0),
        ),
        *bar,
    ]
}

pub fn assert_values_match(
    bar_idx: usize,
    closed: Option<f64>,
    repainted: Option<f64>,
    tolerance: f64,
) {
    match (closed, repainted) {
        (None, None) => {}
        (Some(c), Some(r)) => {
            let diff = (c - r).abs();
            assert!(
                diff <= tolerance,
                "diverged at bar {bar_idx}: closed={c:.10}, repainted={r:.10}, diff={diff:.2e}"
            );
        }
        (c, r) => {
            panic!("convergence mismatch at bar {bar_idx}: closed={c:?}, repainted={r:?}");
        }
    }
}

/// Generate reference match + repaint tests for a single-value indicator.
///
/// `$input` maps a `&Candle` to the indicator input.
///
/// Usage: `reference_test!(sma_5, Sma, SmaConfig::new(nz(5)), |c: &Candle| c.close, "sma-5.csv", 2);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $input:expr, $ref_file:expr, $decimals:expr) => {
        mod $name {
            use super::fixtures::*;
            use std::num::NonZero;
            use streamta::*;

            const REPAINT_TOLERANCE: f64 = 1e-7;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let reference = load_ref_values($ref_file);
                let mut ind = <$ind>::new($config);

                let results: Vec<Option<f64>> =
                    tulip_candles().iter().map(|c| ind.add($input(c))).collect();

                assert_series(stringify!($name), &results, &reference, $decimals);
            }

            #[test]
            fn repaint_matches_closed() {
                let bars = random_walk::<f64>();
                let mut closed = <$ind>::new($config);
                let mut repainted = <$ind>::new($config);

                for (i, bar) in bars.iter().enumerate() {
                    closed.add($input(bar));

                    let [open, mid, last] = repaint_sequence(bar);
                    repainted.add($input(&open));
                    repainted.replace($input(&mid));
                    repainted.replace($input(&last));

                    assert_values_match(i, closed.value(), repainted.value(), REPAINT_TOLERANCE);
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;
