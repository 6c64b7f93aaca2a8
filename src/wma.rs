use std::fmt::Display;

use crate::{Indicator, IndicatorConfig, Num, Window};

interval_config!(
    /// Configuration for the Weighted Moving Average ([`Wma`]).
    WmaConfig,
    WmaConfigBuilder
);

impl IndicatorConfig for WmaConfig {
    type Builder = WmaConfigBuilder;

    fn builder() -> Self::Builder {
        WmaConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval()
    }
}

/// Weighted Moving Average (WMA).
///
/// Linear weights: the oldest retained observation has weight 1, the newest
/// weight `interval`, normalised by `interval × (interval + 1) / 2`.
///
/// # Example
///
/// ```
/// use streamta::{Wma, WmaConfig};
/// use std::num::NonZero;
///
/// let mut wma: Wma = Wma::new(WmaConfig::new(NonZero::new(3).unwrap()));
/// wma.add(1.0);
/// wma.add(2.0);
/// // (1 + 4 + 9) / 6
/// assert_eq!(wma.add(3.0), Some(14.0 / 6.0));
/// ```
#[derive(Clone, Debug)]
pub struct Wma<N: Num = f64> {
    config: WmaConfig,
    window: Window<N>,
    denominator: N,
    current: Option<N>,
}

impl<N: Num> Indicator for Wma<N> {
    type Config = WmaConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        let n = config.interval();
        Self {
            config,
            window: Window::new(n),
            denominator: N::from_usize(n * (n + 1) / 2),
            current: None,
        }
    }

    fn config(&self) -> &WmaConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        self.window.push_update(replace, price);

        self.current = self.window.is_full().then(|| {
            let weighted: N = self
                .window
                .iter()
                .enumerate()
                .map(|(i, &value)| value * N::from_usize(i + 1))
                .sum();
            weighted / self.denominator
        });
        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Display for Wma<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WMA({})", self.config.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_rounded, nz};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn wma(interval: usize) -> Wma {
        Wma::new(WmaConfig::new(nz(interval)))
    }

    #[test]
    fn none_until_window_full() {
        let mut wma = wma(3);
        assert_eq!(wma.add(11.0), None);
        assert_eq!(wma.add(12.0), None);
        assert!(wma.add(13.0).is_some());
    }

    #[test]
    fn newest_value_weighs_most() {
        let mut wma = wma(3);
        let results = wma.updates([11.0, 12.0, 13.0, 14.0, 15.0], false);
        assert_rounded!(results[4].unwrap(), 14.33, 2);
    }

    #[test]
    fn replace_newest_value() {
        let mut wma = wma(3);
        wma.updates([11.0, 12.0, 13.0, 14.0, 15.0], false);
        assert_rounded!(wma.replace(1000.0).unwrap(), 506.83, 2);
        assert_rounded!(wma.replace(15.0).unwrap(), 14.33, 2);
    }

    #[test]
    fn exact_track() {
        let mut wma: Wma<Decimal> = Wma::new(WmaConfig::new(nz(2)));
        wma.add(dec!(3));
        // (3 + 2 × 6) / 3
        assert_eq!(wma.add(dec!(6)), Some(dec!(5)));
    }

    #[test]
    fn display() {
        assert_eq!(wma(9).to_string(), "WMA(9)");
        assert_eq!(wma(9).required_inputs(), 9);
    }
}
