use std::{fmt::Display, num::NonZero};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    Candle, ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, MovingAverage,
    MovingAverageConfig, Num, Smoothing,
    indicator::{positive, require},
};

/// Configuration for [`AccelerationBands`].
///
/// ```
/// use rust_decimal_macros::dec;
/// use streamta::{AccelerationBandsConfig, IndicatorConfig, IndicatorConfigBuilder, Smoothing};
/// use std::num::NonZero;
///
/// let config = AccelerationBandsConfig::builder()
///     .interval(NonZero::new(20).unwrap())
///     .width(dec!(2))
///     .smoothing(Smoothing::Ema)
///     .build()
///     .unwrap();
/// assert_eq!(config.required_inputs(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccelerationBandsConfig {
    interval: NonZero<usize>,
    width: Decimal,
    smoothing: Smoothing,
}

impl AccelerationBandsConfig {
    /// SMA bands with Headley's width factor of 4.
    #[must_use]
    pub fn new(interval: NonZero<usize>) -> Self {
        Self {
            interval,
            width: dec!(4),
            smoothing: Smoothing::Sma,
        }
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }

    /// Multiplier applied to each bar's relative range.
    #[inline]
    #[must_use]
    pub fn width(&self) -> Decimal {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

impl IndicatorConfig for AccelerationBandsConfig {
    type Builder = AccelerationBandsConfigBuilder;

    fn builder() -> Self::Builder {
        AccelerationBandsConfigBuilder {
            interval: None,
            width: dec!(4),
            smoothing: Smoothing::Sma,
        }
    }

    fn required_inputs(&self) -> usize {
        self.smoothing.required_inputs(self.interval)
    }
}

impl Display for AccelerationBandsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AccelerationBandsConfig({}, {}, {})",
            self.interval, self.width, self.smoothing
        )
    }
}

/// Builder for [`AccelerationBandsConfig`].
///
/// Defaults: width = `4`, smoothing = [`Smoothing::Sma`]. The interval must be
/// set.
pub struct AccelerationBandsConfigBuilder {
    interval: Option<NonZero<usize>>,
    width: Decimal,
    smoothing: Smoothing,
}

impl AccelerationBandsConfigBuilder {
    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }

    /// Sets the width factor. Must be positive.
    #[must_use]
    pub fn width(mut self, width: Decimal) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }
}

impl IndicatorConfigBuilder<AccelerationBandsConfig> for AccelerationBandsConfigBuilder {
    fn build(self) -> Result<AccelerationBandsConfig, ConfigError> {
        Ok(AccelerationBandsConfig {
            interval: require(self.interval, "interval")?,
            width: positive(self.width, "width")?,
            smoothing: self.smoothing,
        })
    }
}

/// Upper, middle and lower acceleration band.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccelerationBandsValue<N: Num = f64> {
    upper: N,
    middle: N,
    lower: N,
}

impl<N: Num> AccelerationBandsValue<N> {
    #[inline]
    #[must_use]
    pub fn upper(&self) -> N {
        self.upper
    }

    /// Smoothed close.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> N {
        self.middle
    }

    #[inline]
    #[must_use]
    pub fn lower(&self) -> N {
        self.lower
    }
}

/// Acceleration Bands (ABANDS), Price Headley.
///
/// Envelopes that widen with each bar's relative range:
///
/// ```text
/// c      = (high − low) / (high + low) × width
/// upper  = MA(high × (1 + c))
/// middle = MA(close)
/// lower  = MA(low × (1 − c))
/// ```
///
/// A bar with `high + low = 0` has coefficient 0.
#[derive(Clone, Debug)]
pub struct AccelerationBands<N: Num = f64> {
    config: AccelerationBandsConfig,
    width: N,
    upper: MovingAverage<N>,
    middle: MovingAverage<N>,
    lower: MovingAverage<N>,
    current: Option<AccelerationBandsValue<N>>,
}

impl<N: Num> Indicator for AccelerationBands<N> {
    type Config = AccelerationBandsConfig;
    type Input = Candle<N>;
    type Output = AccelerationBandsValue<N>;

    fn new(config: Self::Config) -> Self {
        let smoothing = MovingAverageConfig::new(config.smoothing, config.interval);
        Self {
            config,
            width: N::from_decimal(config.width),
            upper: MovingAverage::new(smoothing),
            middle: MovingAverage::new(smoothing),
            lower: MovingAverage::new(smoothing),
            current: None,
        }
    }

    fn config(&self) -> &AccelerationBandsConfig {
        &self.config
    }

    fn update(
        &mut self,
        candle: Candle<N>,
        replace: bool,
    ) -> Option<AccelerationBandsValue<N>> {
        let coefficient = (candle.high - candle.low)
            .checked_div(candle.high + candle.low)
            .map_or(N::ZERO, |ratio| ratio * self.width);

        let upper = self
            .upper
            .update(candle.high * (N::ONE + coefficient), replace);
        let middle = self.middle.update(candle.close, replace);
        let lower = self
            .lower
            .update(candle.low * (N::ONE - coefficient), replace);

        self.current = match (upper, middle, lower) {
            (Some(upper), Some(middle), Some(lower)) => Some(AccelerationBandsValue {
                upper,
                middle,
                lower,
            }),
            _ => None,
        };
        self.current
    }

    fn value(&self) -> Option<AccelerationBandsValue<N>> {
        self.current
    }
}

impl<N: Num> Display for AccelerationBands<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ABANDS({}, {}, {})",
            self.config.interval, self.config.width, self.config.smoothing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_rounded, hlc, nz};
    use rust_decimal_macros::dec;

    // QuantConnect Lean spy_acceleration_bands_20_4
    const SPY: [(f64, f64, f64); 20] = [
        (198.05, 194.96, 195.55),
        (193.86, 191.61, 192.59),
        (197.61, 195.17, 197.43),
        (199.47, 194.35, 194.79),
        (197.22, 194.25, 195.85),
        (196.82, 194.53, 196.74),
        (197.01, 195.43, 196.01),
        (198.99, 195.96, 198.46),
        (200.41, 198.41, 200.18),
        (202.89, 199.28, 199.73),
        (198.68, 194.96, 195.45),
        (197.68, 195.21, 196.46),
        (194.46, 192.56, 193.91),
        (194.67, 192.91, 193.6),
        (193.45, 190.56, 192.9),
        (195.0, 191.81, 192.85),
        (191.91, 187.64, 188.01),
        (189.74, 186.93, 188.12),
        (191.83, 189.44, 191.63),
        (192.49, 189.82, 192.13),
    ];

    fn spy() -> Vec<Candle> {
        SPY.iter().map(|&(h, l, c)| hlc(h, l, c)).collect()
    }

    #[test]
    fn matches_lean_reference() {
        let mut bands: AccelerationBands =
            AccelerationBands::new(AccelerationBandsConfig::new(nz(20)));
        let results = bands.updates(spy(), false);
        assert!(results[..19].iter().all(Option::is_none));

        let value = results[19].unwrap();
        assert_rounded!(value.lower(), 187.6891, 4);
        assert_rounded!(value.middle(), 194.6195, 4);
        assert_rounded!(value.upper(), 201.8016, 4);

        let value = bands.add(hlc(195.03, 189.12, 195.0)).unwrap();
        assert_rounded!(value.lower(), 187.1217, 4);
        assert_rounded!(value.middle(), 194.5920, 4);
        assert_rounded!(value.upper(), 201.9392, 4);
    }

    #[test]
    fn replace_then_restore() {
        let mut bands: AccelerationBands =
            AccelerationBands::new(AccelerationBandsConfig::new(nz(20)));
        bands.updates(spy(), false);
        let closed = bands.add(hlc(195.03, 189.12, 195.0)).unwrap();

        bands.replace(hlc(250.0, 150.0, 240.0));
        let restored = bands.replace(hlc(195.03, 189.12, 195.0)).unwrap();
        assert_rounded!(restored.upper(), closed.upper(), 9);
        assert_rounded!(restored.lower(), closed.lower(), 9);
    }

    #[test]
    fn zero_prices_have_no_coefficient() {
        let config = AccelerationBandsConfig::builder()
            .interval(nz(1))
            .width(dec!(2))
            .build()
            .unwrap();
        let mut bands: AccelerationBands = AccelerationBands::new(config);
        let value = bands.add(hlc(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(
            (value.upper(), value.middle(), value.lower()),
            (0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn builder_rejects_non_positive_width() {
        let result = AccelerationBandsConfig::builder()
            .interval(nz(20))
            .width(dec!(0))
            .build();
        assert_eq!(result, Err(ConfigError::NotPositive("width")));
    }

    #[test]
    fn display() {
        let bands: AccelerationBands =
            AccelerationBands::new(AccelerationBandsConfig::new(nz(20)));
        assert_eq!(bands.to_string(), "ABANDS(20, 4, Sma)");
    }
}
