use std::{fmt::Display, num::NonZero};

use tracing::trace;

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, MomentumSignal, MovingAverage,
    MovingAverageConfig, Num, Register, Signal, Signaling, Smoothing, indicator::require,
    signal::SignalState,
};

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// With the default Wilder smoothing the SMA seed (first `interval` price
/// changes) influences all subsequent values. Output begins at input
/// `interval + 1`.
///
/// # Example
///
/// ```
/// use streamta::{IndicatorConfig, RsiConfig};
/// use std::num::NonZero;
///
/// let config = RsiConfig::new(NonZero::new(14).unwrap());
/// assert_eq!(config.interval(), 14);
/// assert_eq!(config.required_inputs(), 15);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RsiConfig {
    interval: NonZero<usize>,
    smoothing: Smoothing,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    /// One input more than the smoothing needs: the first price only
    /// establishes a reference for the first change.
    #[inline]
    fn required_inputs(&self) -> usize {
        self.smoothing.required_inputs(self.interval) + 1
    }
}

impl RsiConfig {
    /// RSI with Wilder smoothing.
    #[must_use]
    pub fn new(interval: NonZero<usize>) -> Self {
        Self {
            interval,
            smoothing: Smoothing::Wsma,
        }
    }

    /// Same interval with a different smoothing.
    #[must_use]
    pub fn with_smoothing(self, smoothing: Smoothing) -> Self {
        Self { smoothing, ..self }
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }

    #[inline]
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.interval, self.smoothing)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: smoothing = [`Smoothing::Wsma`].
/// The interval must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct RsiConfigBuilder {
    interval: Option<NonZero<usize>>,
    smoothing: Smoothing,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            interval: None,
            smoothing: Smoothing::Wsma,
        }
    }

    #[inline]
    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }

    #[inline]
    #[must_use]
    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn build(self) -> Result<RsiConfig, ConfigError> {
        Ok(RsiConfig {
            interval: require(self.interval, "interval")?,
            smoothing: self.smoothing,
        })
    }
}

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values at or above 70 signal overbought; at or below 30,
/// oversold.
///
/// Gains and losses are smoothed separately (Wilder's method by default):
///
/// ```text
/// RS  = avg_gain / avg_loss
/// RSI = 100 − 100 / (1 + RS)
/// ```
///
/// A window without losses saturates at exactly 100.
///
/// # Example
///
/// ```
/// use streamta::{Rsi, RsiConfig};
/// use std::num::NonZero;
///
/// let mut rsi: Rsi = Rsi::new(RsiConfig::new(NonZero::new(3).unwrap()));
///
/// // Seeding: need 3 price changes (4 inputs)
/// assert_eq!(rsi.add(10.0), None);
/// assert_eq!(rsi.add(12.0), None);
/// assert_eq!(rsi.add(11.0), None);
///
/// // changes = +2, −1, +2 → avg_gain = 4/3, avg_loss = 1/3 → RSI = 80
/// assert!((rsi.add(13.0).unwrap() - 80.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Rsi<N: Num = f64> {
    config: RsiConfig,
    prices: Register<N>,
    gains: MovingAverage<N>,
    losses: MovingAverage<N>,
    current: Option<N>,
    momentum: SignalState<MomentumSignal>,
}

impl<N: Num> Rsi<N> {
    fn strength(avg_gain: N, avg_loss: N) -> N {
        match avg_gain.checked_div(avg_loss) {
            Some(rs) => N::HUNDRED - N::HUNDRED / (N::ONE + rs),
            None => {
                trace!(%avg_gain, "rsi: no losses in window, saturating at 100");
                N::HUNDRED
            }
        }
    }
}

impl<N: Num> Indicator for Rsi<N> {
    type Config = RsiConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        let smoothing = MovingAverageConfig::new(config.smoothing, config.interval);

        Self {
            config,
            prices: Register::default(),
            gains: MovingAverage::new(smoothing),
            losses: MovingAverage::new(smoothing),
            current: None,
            momentum: SignalState::default(),
        }
    }

    #[inline]
    fn config(&self) -> &RsiConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        let replace = replace && self.prices.get().is_some();
        let previous = self.prices.base(replace);
        self.prices.set(price, replace);

        self.current = previous.and_then(|previous| {
            let change = price - previous;
            let gain = self.gains.update(change.max(N::ZERO), replace);
            let loss = self.losses.update((-change).max(N::ZERO), replace);

            gain.zip(loss)
                .map(|(avg_gain, avg_loss)| Self::strength(avg_gain, avg_loss))
        });

        let state = self.current.map_or(MomentumSignal::Unknown, |rsi| {
            MomentumSignal::from_bounds(rsi, N::from_usize(30), N::from_usize(70))
        });
        self.momentum.record(state, replace);

        self.current
    }

    #[inline]
    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Signaling for Rsi<N> {
    type State = MomentumSignal;

    fn signal(&self) -> Signal<MomentumSignal> {
        self.momentum.signal()
    }
}

impl<N: Num> Display for Rsi<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.interval, self.config.smoothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{PRICES, assert_approx, assert_rounded, nz};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rsi(interval: usize) -> Rsi {
        Rsi::new(RsiConfig::new(nz(interval)))
    }

    mod seeding {
        use super::*;

        #[test]
        fn none_until_interval_plus_one() {
            let mut rsi = rsi(3);
            let results = rsi.updates([10.0, 12.0, 11.0], false);
            assert_eq!(results, vec![None; 3]);
            assert!(rsi.add(13.0).is_some());
            assert_eq!(rsi.required_inputs(), 4);
        }

        #[test]
        fn replace_first_price() {
            let mut rsi = rsi(1);
            assert_eq!(rsi.add(10.0), None);
            assert_eq!(rsi.replace(8.0), None);
            // +2 against the replaced 8
            assert_eq!(rsi.add(10.0), Some(100.0));
        }
    }

    mod saturation {
        use super::*;

        #[test]
        fn flat_prices_are_exactly_100() {
            let mut rsi: Rsi<Decimal> = Rsi::new(RsiConfig::new(nz(2)));
            let results = rsi.updates([dec!(2), dec!(2), dec!(2)], false);
            assert_eq!(results[2], Some(dec!(100)));
        }

        #[test]
        fn only_losses_is_zero() {
            let mut rsi = rsi(2);
            rsi.updates([5.0, 4.0, 3.0], false);
            assert_eq!(rsi.value(), Some(0.0));
        }
    }

    mod reference {
        use super::*;

        #[test]
        fn matches_tulip_reference() {
            let expected = [
                72.034, 64.927, 75.936, 79.796, 74.713, 83.033, 87.478, 88.755, 91.483, 78.498,
            ];

            let mut rsi = rsi(5);
            let results = rsi.updates(PRICES, false);

            assert!(results[..5].iter().all(Option::is_none));
            for (actual, expected) in results[5..].iter().zip(expected) {
                assert_rounded!(actual.unwrap(), expected, 3);
            }
        }

        #[test]
        fn wma_smoothing() {
            let config = RsiConfig::builder()
                .interval(nz(2))
                .smoothing(Smoothing::Wma)
                .build()
                .unwrap();
            let mut rsi: Rsi = Rsi::new(config);
            // changes +2, −1 weighted 1 and 2: gain 2/3, loss 2/3
            let results = rsi.updates([10.0, 12.0, 11.0], false);
            assert_approx!(results[2].unwrap(), 50.0);
        }
    }

    mod replace {
        use super::*;

        #[test]
        fn replace_then_restore() {
            let mut rsi = rsi(5);
            rsi.updates(PRICES[..7].iter().copied(), false);

            rsi.add(90.0);
            let restored = rsi.replace(PRICES[7]).unwrap();
            assert_rounded!(restored, 75.94, 2);
        }

        #[test]
        fn repeated_replace_targets_same_bar() {
            let mut rsi = rsi(3);
            rsi.updates([10.0, 12.0, 11.0, 13.0], false);
            let closed = rsi.value().unwrap();
            rsi.replace(20.0);
            rsi.replace(5.0);
            assert_approx!(rsi.replace(13.0).unwrap(), closed);
        }
    }

    mod signal {
        use super::*;

        #[test]
        fn overbought_and_oversold() {
            let mut rsi = rsi(2);
            rsi.updates([1.0, 2.0, 3.0], false);
            assert_eq!(rsi.signal().state, MomentumSignal::Overbought);
            assert!(rsi.signal().has_changed);

            rsi.updates([1.0, 0.5, 0.25], false);
            assert_eq!(rsi.signal().state, MomentumSignal::Oversold);
        }

        #[test]
        fn unknown_while_seeding() {
            let mut rsi = rsi(14);
            rsi.add(1.0);
            assert_eq!(rsi.signal().state, MomentumSignal::Unknown);
        }
    }

    mod config {
        use super::*;

        #[test]
        fn builder_requires_interval() {
            assert_eq!(
                RsiConfig::builder().build(),
                Err(ConfigError::Missing("interval"))
            );
        }

        #[test]
        fn display() {
            assert_eq!(RsiConfig::new(nz(14)).to_string(), "RsiConfig(14, Wsma)");
            assert_eq!(rsi(14).to_string(), "RSI(14, Wsma)");
        }
    }
}
