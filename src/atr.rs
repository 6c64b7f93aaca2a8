use std::fmt::Display;

use crate::{
    Candle, Indicator, IndicatorConfig, MovingAverage, MovingAverageConfig, Num, Tr, TrConfig,
};

smoothed_config!(
    /// Configuration for the Average True Range ([`Atr`]) indicator.
    ///
    /// ```
    /// use streamta::{AtrConfig, IndicatorConfig};
    /// use std::num::NonZero;
    ///
    /// let config = AtrConfig::new(NonZero::new(14).unwrap());
    /// assert_eq!(config.required_inputs(), 14);
    /// ```
    AtrConfig,
    AtrConfigBuilder
);

impl IndicatorConfig for AtrConfig {
    type Builder = AtrConfigBuilder;

    fn builder() -> Self::Builder {
        AtrConfigBuilder::new()
    }

    /// The first candle already yields a range, so the true range adds no
    /// warm-up of its own.
    fn required_inputs(&self) -> usize {
        self.smoothing.required_inputs(self.interval)
    }
}

/// Average True Range (ATR).
///
/// The [`Tr`] series smoothed with Wilder's method by default. A volatility
/// measure: larger values mean wider bars and gaps.
#[derive(Clone, Debug)]
pub struct Atr<N: Num = f64> {
    config: AtrConfig,
    tr: Tr<N>,
    smoothing: MovingAverage<N>,
}

impl<N: Num> Indicator for Atr<N> {
    type Config = AtrConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            tr: Tr::new(TrConfig),
            smoothing: MovingAverage::new(MovingAverageConfig::new(
                config.smoothing,
                config.interval,
            )),
        }
    }

    fn config(&self) -> &AtrConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        // seeded with the plain range of the first candle
        self.tr.update(candle, replace);
        let tr = self.tr.range()?;
        self.smoothing.update(tr, replace)
    }

    #[inline]
    fn value(&self) -> Option<N> {
        self.smoothing.value()
    }
}

impl<N: Num> Display for Atr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({}, {})", self.config.interval, self.config.smoothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_rounded, candles, hlc, nz};
    use crate::{IndicatorConfigBuilder, Smoothing};

    fn atr(interval: usize) -> Atr {
        Atr::new(AtrConfig::new(nz(interval)))
    }

    #[test]
    fn matches_tulip_reference() {
        let expected = [
            1.12, 1.05, 1.01, 1.21, 1.14, 1.09, 1.24, 1.23, 1.23, 1.21, 1.14,
        ];

        let mut atr = atr(5);
        let results = atr.updates(candles(), false);

        assert!(results[..4].iter().all(Option::is_none));
        for (actual, expected) in results[4..].iter().zip(expected) {
            assert_rounded!(actual.unwrap(), expected, 2);
        }
    }

    #[test]
    fn replace_then_restore() {
        let candles = candles();
        let mut atr = atr(5);
        atr.updates(candles[..8].iter().copied(), false);
        let closed = atr.value().unwrap();

        atr.replace(hlc(99.0, 70.0, 90.0));
        assert_eq!(atr.replace(candles[7]), Some(closed));
        assert_rounded!(atr.add(candles[8]).unwrap(), 1.23, 2);
    }

    #[test]
    fn sma_smoothing() {
        let config = AtrConfig::builder()
            .interval(nz(2))
            .smoothing(Smoothing::Sma)
            .build()
            .unwrap();
        let mut atr: Atr = Atr::new(config);
        atr.add(hlc(2.0, 1.0, 1.5));
        // ranges 1 and 3
        assert_eq!(atr.add(hlc(4.0, 1.0, 2.0)), Some(2.0));
    }

    #[test]
    fn display() {
        assert_eq!(AtrConfig::new(nz(14)).to_string(), "AtrConfig(14, Wsma)");
        assert_eq!(atr(14).to_string(), "ATR(14, Wsma)");
    }
}
