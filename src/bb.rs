use std::{fmt::Display, num::NonZero};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Num,
    indicator::{positive, require},
    price_window::PriceWindowWithSumOfSquares,
};

/// Configuration for the Bollinger Bands ([`Bb`]) indicator.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use streamta::{BbConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// // Default: 2.0 std devs
/// let config = BbConfig::builder()
///     .interval(NonZero::new(20).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.interval(), 20);
/// assert_eq!(config.deviation(), dec!(2));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BbConfig {
    interval: NonZero<usize>,
    deviation: Decimal,
}

impl IndicatorConfig for BbConfig {
    type Builder = BbConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BbConfigBuilder::new()
    }

    #[inline]
    fn required_inputs(&self) -> usize {
        self.interval.get()
    }
}

impl BbConfig {
    /// BB over `interval` observations, 2σ.
    #[must_use]
    pub fn new(interval: NonZero<usize>) -> Self {
        Self {
            interval,
            deviation: dec!(2),
        }
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn deviation(&self) -> Decimal {
        self.deviation
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BbConfig({}, {})", self.interval, self.deviation)
    }
}

/// Builder for [`BbConfig`].
///
/// Defaults: deviation = `2`.
/// The interval must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct BbConfigBuilder {
    interval: Option<NonZero<usize>>,
    deviation: Decimal,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            interval: None,
            deviation: dec!(2),
        }
    }

    #[inline]
    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }

    /// Sets the standard deviation multiplier. Must be positive.
    #[inline]
    #[must_use]
    pub fn deviation(mut self, deviation: Decimal) -> Self {
        self.deviation = deviation;
        self
    }
}

impl IndicatorConfigBuilder<BbConfig> for BbConfigBuilder {
    #[inline]
    fn build(self) -> Result<BbConfig, ConfigError> {
        Ok(BbConfig {
            interval: require(self.interval, "interval")?,
            deviation: positive(self.deviation, "deviation")?,
        })
    }
}

/// Bollinger Bands output: upper, middle, and lower bands.
///
/// The middle band is the SMA. Upper and lower bands are offset by
/// `deviation × σ`, where `σ` is the population standard deviation of the
/// window.
///
/// ```text
/// upper  = SMA + k × σ
/// middle = SMA
/// lower  = SMA − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BbValue<N: Num = f64> {
    upper: N,
    middle: N,
    lower: N,
}

impl<N: Num> BbValue<N> {
    /// Upper band: `SMA + k × σ`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> N {
        self.upper
    }

    /// Middle band: SMA of the window.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> N {
        self.middle
    }

    /// Lower band: `SMA − k × σ`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> N {
        self.lower
    }

    /// Band width: `upper − lower`.
    #[inline]
    #[must_use]
    pub fn width(&self) -> N {
        self.upper - self.lower
    }
}

impl<N: Num> Display for BbValue<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB(u: {}, m: {}, l: {})",
            self.upper, self.middle, self.lower
        )
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator consisting of three bands: a simple moving average
/// (middle) with upper and lower bands offset by a configurable number of
/// standard deviations.
///
/// Uses a running sum and sum of squares for O(1) updates per observation.
/// The only non-constant operation is the square root.
///
/// # Example
///
/// ```
/// use streamta::{Bb, BbConfig};
/// use std::num::NonZero;
///
/// let mut bb: Bb = Bb::new(BbConfig::new(NonZero::new(2).unwrap()));
/// bb.add(3.0);
///
/// // mean 4, σ 1
/// let value = bb.add(5.0).unwrap();
/// assert_eq!(value.upper(), 6.0);
/// assert_eq!(value.middle(), 4.0);
/// assert_eq!(value.lower(), 2.0);
/// ```
#[derive(Clone, Debug)]
pub struct Bb<N: Num = f64> {
    config: BbConfig,
    deviation: N,
    window: PriceWindowWithSumOfSquares<N>,
    current: Option<BbValue<N>>,
}

impl<N: Num> Indicator for Bb<N> {
    type Config = BbConfig;
    type Input = N;
    type Output = BbValue<N>;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            deviation: N::from_decimal(config.deviation),
            window: PriceWindowWithSumOfSquares::new(config.interval.get()),
            current: None,
        }
    }

    #[inline]
    fn config(&self) -> &BbConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, price: N, replace: bool) -> Option<Self::Output> {
        self.window.update(price, replace);

        self.current = match (self.window.mean(), self.window.variance()) {
            (Some(mean), Some(variance)) => {
                let offset = variance.sqrt() * self.deviation;

                Some(BbValue {
                    upper: mean + offset,
                    middle: mean,
                    lower: mean - offset,
                })
            }
            _ => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl<N: Num> Display for Bb<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {})",
            self.config.interval, self.config.deviation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{PRICES, assert_rounded, nz};

    fn bb(interval: usize) -> Bb {
        Bb::new(BbConfig::new(nz(interval)))
    }

    fn bb_with_deviation(interval: usize, deviation: Decimal) -> Bb {
        Bb::new(
            BbConfig::builder()
                .interval(nz(interval))
                .deviation(deviation)
                .build()
                .unwrap(),
        )
    }

    fn assert_bb(value: Option<BbValue>, upper: f64, middle: f64, lower: f64) {
        let v = value.expect("expected Some(BbValue)");
        assert!(
            (v.upper() - upper).abs() < 1e-10,
            "upper: expected {upper}, got {}",
            v.upper()
        );
        assert!(
            (v.middle() - middle).abs() < 1e-10,
            "middle: expected {middle}, got {}",
            v.middle()
        );
        assert!(
            (v.lower() - lower).abs() < 1e-10,
            "lower: expected {lower}, got {}",
            v.lower()
        );
    }

    mod filling {
        use super::*;

        #[test]
        fn none_until_window_full() {
            let mut bb = bb(3);
            assert!(bb.add(10.0).is_none());
            assert!(bb.add(20.0).is_none());
            assert!(bb.add(30.0).is_some());
        }
    }

    mod computation {
        use super::*;

        #[test]
        fn constant_input_zero_width() {
            let mut bb = bb(3);
            bb.updates([10.0, 10.0], false);
            assert_bb(bb.add(10.0), 10.0, 10.0, 10.0);
        }

        #[test]
        fn matches_tulip_reference() {
            let lower = [
                80.53, 80.99, 82.53, 82.47, 82.42, 82.44, 82.51, 83.14, 83.54, 83.87, 85.29,
            ];
            let middle = [
                82.43, 82.74, 83.09, 83.32, 83.63, 83.78, 84.25, 84.99, 85.57, 86.22, 86.80,
            ];

            let mut bb = bb(5);
            let results: Vec<_> = bb.updates(PRICES, false).into_iter().flatten().collect();

            assert_eq!(results.len(), middle.len());
            for (i, v) in results.iter().enumerate() {
                assert_rounded!(v.lower(), lower[i], 2);
                assert_rounded!(v.middle(), middle[i], 2);
                // symmetric around the middle band
                assert_rounded!(v.upper(), 2.0 * middle[i] - lower[i], 1);
            }
        }

        #[test]
        fn exact_track() {
            let mut bb: Bb<Decimal> = Bb::new(BbConfig::new(nz(4)));
            bb.updates([dec!(2), dec!(4), dec!(4), dec!(6)], false);
            // mean 4, variance 2
            let v = bb.value().unwrap();
            assert_eq!(v.middle(), dec!(4));
            assert!((v.width() - dec!(4) * dec!(2).sqrt()).abs() < dec!(0.0000001));
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn updates_on_advance() {
            // [3, 5] → [5, 7]
            let mut bb = bb(2);
            bb.updates([3.0, 5.0], false);
            assert_bb(bb.add(7.0), 8.0, 6.0, 4.0);
        }
    }

    mod replace {
        use super::*;

        #[test]
        fn replaces_current_observation() {
            // [3, 5] then replace → [3, 7]
            // mean=5, variance=4, σ=2
            let mut bb = bb(2);
            bb.updates([3.0, 5.0], false);
            assert_bb(bb.replace(7.0), 9.0, 5.0, 1.0);
        }

        #[test]
        fn replace_during_filling() {
            let mut bb = bb(2);
            bb.add(3.0);
            assert!(bb.replace(4.0).is_none());
            // [4, 6], mean=5, σ=1
            assert_bb(bb.add(6.0), 7.0, 5.0, 3.0);
        }
    }

    mod deviation {
        use super::*;

        #[test]
        fn fractional_multiplier() {
            // [3, 5], σ=1
            let mut bb = bb_with_deviation(2, dec!(1.5));
            bb.add(3.0);
            assert_bb(bb.add(5.0), 5.5, 4.0, 2.5);
        }

        #[test]
        fn wider_multiplier_wider_bands() {
            let mut narrow = bb_with_deviation(2, dec!(1));
            let mut wide = bb_with_deviation(2, dec!(3));
            narrow.add(3.0);
            wide.add(3.0);

            let v1 = narrow.add(5.0).unwrap();
            let v2 = wide.add(5.0).unwrap();
            assert!(v2.width() > v1.width());
        }
    }

    mod config {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn rejects_non_positive_deviation() {
            let result = BbConfig::builder()
                .interval(nz(20))
                .deviation(dec!(0))
                .build();
            assert_eq!(result, Err(ConfigError::NotPositive("deviation")));
        }

        #[test]
        fn requires_interval() {
            assert_eq!(
                BbConfig::builder().build(),
                Err(ConfigError::Missing("interval"))
            );
        }

        #[test]
        fn eq_and_hash() {
            let mut set = HashSet::new();
            set.insert(BbConfig::new(nz(20)));
            assert!(set.contains(&BbConfig::new(nz(20))));
            assert!(!set.contains(
                &BbConfig::builder()
                    .interval(nz(20))
                    .deviation(dec!(2.5))
                    .build()
                    .unwrap()
            ));
        }
    }

    mod display {
        use super::*;

        #[test]
        fn bb_formats_correctly() {
            assert_eq!(bb(20).to_string(), "BB(20, 2)");
            assert_eq!(BbConfig::new(nz(20)).to_string(), "BbConfig(20, 2)");
        }

        #[test]
        fn bb_value_formats_correctly() {
            let v = BbValue {
                upper: 6.0,
                middle: 4.0,
                lower: 2.0,
            };
            assert_eq!(v.to_string(), "BB(u: 6, m: 4, l: 2)");
        }
    }
}
