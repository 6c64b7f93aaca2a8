use std::{fmt::Display, num::NonZero};

use crate::{
    Candle, ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, MovingAverage,
    MovingAverageConfig, Num, PriceSource, Signal, Signaling, Smoothing, TrendSignal,
    indicator::require, signal::SignalState,
};

/// Configuration for the Awesome Oscillator ([`Ao`]).
///
/// ```
/// use streamta::{AoConfig, IndicatorConfig};
///
/// let config = AoConfig::default_5_34();
/// assert_eq!(config.required_inputs(), 34);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AoConfig {
    short: NonZero<usize>,
    long: NonZero<usize>,
    smoothing: Smoothing,
}

impl AoConfig {
    /// Bill Williams' 5 / 34 bar SMAs of the median price.
    #[must_use]
    pub fn default_5_34() -> Self {
        Self {
            short: NonZero::<usize>::MIN.saturating_add(4),
            long: NonZero::<usize>::MIN.saturating_add(33),
            smoothing: Smoothing::Sma,
        }
    }

    #[inline]
    #[must_use]
    pub fn short(&self) -> usize {
        self.short.get()
    }

    #[inline]
    #[must_use]
    pub fn long(&self) -> usize {
        self.long.get()
    }

    #[inline]
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

impl IndicatorConfig for AoConfig {
    type Builder = AoConfigBuilder;

    fn builder() -> Self::Builder {
        AoConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.smoothing
            .required_inputs(self.short)
            .max(self.smoothing.required_inputs(self.long))
    }
}

impl Display for AoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AoConfig({}, {}, {})",
            self.short, self.long, self.smoothing
        )
    }
}

/// Builder for [`AoConfig`].
///
/// Defaults: 5 / 34, [`Smoothing::Sma`]. The short interval must be less
/// than the long one.
pub struct AoConfigBuilder {
    short: Option<NonZero<usize>>,
    long: Option<NonZero<usize>>,
    smoothing: Smoothing,
}

impl AoConfigBuilder {
    fn new() -> Self {
        let defaults = AoConfig::default_5_34();
        Self {
            short: Some(defaults.short),
            long: Some(defaults.long),
            smoothing: defaults.smoothing,
        }
    }

    #[must_use]
    pub fn short(mut self, interval: NonZero<usize>) -> Self {
        self.short.replace(interval);
        self
    }

    #[must_use]
    pub fn long(mut self, interval: NonZero<usize>) -> Self {
        self.long.replace(interval);
        self
    }

    #[must_use]
    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }
}

impl IndicatorConfigBuilder<AoConfig> for AoConfigBuilder {
    fn build(self) -> Result<AoConfig, ConfigError> {
        let short = require(self.short, "short")?;
        let long = require(self.long, "long")?;

        if short >= long {
            return Err(ConfigError::IntervalOrder {
                short: short.get(),
                long: long.get(),
            });
        }

        Ok(AoConfig {
            short,
            long,
            smoothing: self.smoothing,
        })
    }
}

/// Awesome Oscillator (AO).
///
/// Short minus long moving average of the median price `(high + low) / 2`.
/// Crossing above zero reads bullish, below zero bearish.
#[derive(Clone, Debug)]
pub struct Ao<N: Num = f64> {
    config: AoConfig,
    short: MovingAverage<N>,
    long: MovingAverage<N>,
    current: Option<N>,
    trend: SignalState<TrendSignal>,
}

impl<N: Num> Indicator for Ao<N> {
    type Config = AoConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            short: MovingAverage::new(MovingAverageConfig::new(config.smoothing, config.short)),
            long: MovingAverage::new(MovingAverageConfig::new(config.smoothing, config.long)),
            current: None,
            trend: SignalState::default(),
        }
    }

    fn config(&self) -> &AoConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        let median = PriceSource::HL2.extract(&candle);

        let short = self.short.update(median, replace);
        let long = self.long.update(median, replace);
        self.current = short.zip(long).map(|(short, long)| short - long);

        let state = self.current.map_or(TrendSignal::Unknown, TrendSignal::from_sign);
        self.trend.record(state, replace);

        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Signaling for Ao<N> {
    type State = TrendSignal;

    fn signal(&self) -> Signal<TrendSignal> {
        self.trend.signal()
    }
}

impl<N: Num> Display for Ao<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AO({}, {})", self.config.short, self.config.long)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, hlc, nz};

    fn ao(short: usize, long: usize) -> Ao {
        let config = AoConfig::builder()
            .short(nz(short))
            .long(nz(long))
            .build()
            .unwrap();
        Ao::new(config)
    }

    #[test]
    fn short_minus_long_median() {
        let mut ao = ao(1, 2);
        // medians 2, 6
        assert_eq!(ao.add(hlc(3.0, 1.0, 2.0)), None);
        assert_eq!(ao.add(hlc(7.0, 5.0, 6.0)), Some(2.0));
        assert_eq!(ao.signal().state, TrendSignal::Bullish);
    }

    #[test]
    fn stable_at_long_interval() {
        let mut ao = ao(2, 4);
        let results = ao.updates((0..4).map(|i| hlc(f64::from(i), 0.0, 0.0)), false);
        assert!(results[..3].iter().all(Option::is_none));
        // medians 0, 0.5, 1, 1.5
        assert_approx!(results[3].unwrap(), 1.25 - 0.75);
    }

    #[test]
    fn replace_then_restore() {
        let mut ao = ao(1, 2);
        ao.updates([hlc(3.0, 1.0, 2.0), hlc(7.0, 5.0, 6.0)], false);
        assert_eq!(ao.replace(hlc(1.0, 1.0, 1.0)), Some(-0.5));
        assert_eq!(ao.signal().state, TrendSignal::Bearish);
        assert_eq!(ao.replace(hlc(7.0, 5.0, 6.0)), Some(2.0));
    }

    #[test]
    fn rejects_inverted_intervals() {
        let result = AoConfig::builder().short(nz(34)).long(nz(5)).build();
        assert_eq!(
            result,
            Err(ConfigError::IntervalOrder { short: 34, long: 5 })
        );
    }

    #[test]
    fn display() {
        let ao: Ao = Ao::new(AoConfig::default_5_34());
        assert_eq!(ao.to_string(), "AO(5, 34)");
        assert_eq!(ao.config().to_string(), "AoConfig(5, 34, Sma)");
    }
}
