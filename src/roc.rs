use std::fmt::Display;

use tracing::trace;

use crate::{
    Indicator, IndicatorConfig, Num, Signal, Signaling, TrendSignal, Window, signal::SignalState,
};

interval_config!(
    /// Configuration for the Rate of Change ([`Roc`]) indicator.
    ///
    /// ```
    /// use streamta::{IndicatorConfig, RocConfig};
    /// use std::num::NonZero;
    ///
    /// // the price `interval` bars back must be known
    /// assert_eq!(RocConfig::new(NonZero::new(5).unwrap()).required_inputs(), 6);
    /// ```
    RocConfig,
    RocConfigBuilder
);

impl IndicatorConfig for RocConfig {
    type Builder = RocConfigBuilder;

    fn builder() -> Self::Builder {
        RocConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval() + 1
    }
}

/// Rate of Change (ROC).
///
/// Relative change against the price `interval` observations earlier, as a
/// fraction: `(price − past) / past`. A zero past price has no defined rate
/// and the step yields `None`.
///
/// ```
/// use streamta::{Roc, RocConfig};
/// use std::num::NonZero;
///
/// let mut roc: Roc = Roc::new(RocConfig::new(NonZero::new(2).unwrap()));
/// roc.updates([10.0, 11.0], false);
/// assert_eq!(roc.add(12.5), Some(0.25));
/// ```
#[derive(Clone, Debug)]
pub struct Roc<N: Num = f64> {
    config: RocConfig,
    prices: Window<N>,
    current: Option<N>,
    trend: SignalState<TrendSignal>,
}

impl<N: Num> Indicator for Roc<N> {
    type Config = RocConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            prices: Window::new(config.required_inputs()),
            current: None,
            trend: SignalState::default(),
        }
    }

    fn config(&self) -> &RocConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        self.prices.push_update(replace, price);

        self.current = match self.prices.front() {
            Some(past) if self.prices.is_full() => {
                let rate = (price - past).checked_div(past);
                if rate.is_none() {
                    trace!(%price, "roc: zero reference price");
                }
                rate
            }
            _ => None,
        };

        let state = self.current.map_or(TrendSignal::Unknown, TrendSignal::from_sign);
        self.trend.record(state, replace);

        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Signaling for Roc<N> {
    type State = TrendSignal;

    fn signal(&self) -> Signal<TrendSignal> {
        self.trend.signal()
    }
}

impl<N: Num> Display for Roc<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ROC({})", self.config.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{PRICES, assert_approx, nz};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn roc(interval: usize) -> Roc {
        Roc::new(RocConfig::new(nz(interval)))
    }

    #[test]
    fn matches_tulip_reference() {
        let expected = [
            0.01911999019,
            0.02195904268,
            0.0135151442,
            0.01867469879,
            0.00897021887,
            0.02862297053,
            0.04466441332,
            0.03452791999,
            0.03808397397,
            0.03473210052,
        ];

        let mut roc = roc(5);
        let results = roc.updates(PRICES, false);

        assert!(results[..5].iter().all(Option::is_none));
        for (actual, expected) in results[5..].iter().zip(expected) {
            assert!((actual.unwrap() - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn zero_reference_price_has_no_rate() {
        let mut roc: Roc<Decimal> = Roc::new(RocConfig::new(nz(1)));
        roc.add(dec!(0));
        assert_eq!(roc.add(dec!(5)), None);
        assert_eq!(roc.add(dec!(10)), Some(dec!(1)));
    }

    #[test]
    fn replace_keeps_reference_price() {
        let mut roc = roc(2);
        roc.updates([10.0, 20.0, 15.0], false);
        assert_approx!(roc.replace(5.0).unwrap(), -0.5);
        assert_eq!(roc.add(30.0), Some(0.5));
    }

    #[test]
    fn trend_signal() {
        let mut roc = roc(1);
        roc.updates([10.0, 11.0], false);
        assert_eq!(roc.signal().state, TrendSignal::Bullish);
        roc.add(9.0);
        assert_eq!(roc.signal().state, TrendSignal::Bearish);
        assert!(roc.signal().has_changed);
    }

    #[test]
    fn display() {
        assert_eq!(roc(9).to_string(), "ROC(9)");
    }
}
