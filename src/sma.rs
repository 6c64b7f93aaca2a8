use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Num, indicator::require,
    price_window::PriceWindow,
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use streamta::{IndicatorConfig, SmaConfig};
/// use std::num::NonZero;
///
/// let config = SmaConfig::new(NonZero::new(20).unwrap());
/// assert_eq!(config.interval(), 20);
/// assert_eq!(config.required_inputs(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmaConfig {
    interval: NonZero<usize>,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn required_inputs(&self) -> usize {
        self.interval.get()
    }
}

impl SmaConfig {
    /// SMA over `interval` observations.
    #[must_use]
    pub fn new(interval: NonZero<usize>) -> Self {
        Self { interval }
    }

    /// Window length.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({})", self.interval)
    }
}

/// Builder for [`SmaConfig`].
///
/// The interval must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    interval: Option<NonZero<usize>>,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self { interval: None }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn build(self) -> Result<SmaConfig, ConfigError> {
        Ok(SmaConfig::new(require(self.interval, "interval")?))
    }
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* observations, where *n* is
/// the configured interval. Returns `None` until the window is full.
///
/// Uses a running sum for O(1) updates per observation. A replace swaps the
/// newest value in the window without advancing it.
///
/// # Example
///
/// ```rust
/// use streamta::{Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let mut sma: Sma = Sma::new(SmaConfig::new(NonZero::new(3).unwrap()));
///
/// assert_eq!(sma.add(40.0), None);
/// assert_eq!(sma.add(30.0), None);
/// assert_eq!(sma.add(20.0), Some(30.0));
/// ```
#[derive(Clone, Debug)]
pub struct Sma<N: Num = f64> {
    config: SmaConfig,
    window: PriceWindow<N>,
    current: Option<N>,
}

impl<N: Num> Indicator for Sma<N> {
    type Config = SmaConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: PriceWindow::new(config.interval.get()),
            current: None,
        }
    }

    #[inline]
    fn config(&self) -> &SmaConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        self.window.update(price, replace);
        self.current = self.window.mean();
        self.current
    }

    #[inline]
    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Display for Sma<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({})", self.config.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, nz};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sma(interval: usize) -> Sma {
        Sma::new(SmaConfig::new(nz(interval)))
    }

    mod filling {
        use super::*;

        #[test]
        fn none_until_window_full() {
            let mut sma = sma(3);
            assert_eq!(sma.add(40.0), None);
            assert_eq!(sma.add(30.0), None);
            assert!(!sma.is_stable());
        }

        #[test]
        fn returns_average_when_full() {
            let mut sma = sma(3);
            sma.add(40.0);
            sma.add(30.0);
            assert_eq!(sma.add(20.0), Some(30.0));
            assert!(sma.is_stable());
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn drops_oldest_on_advance() {
            let mut sma = sma(3);
            let results = sma.updates([40.0, 30.0, 20.0, 20.0, 40.0, 80.0], false);
            assert_eq!(results[2], Some(30.0));
            // (20 + 40 + 80) / 3
            assert_approx!(results[5].unwrap(), 140.0 / 3.0);
        }

        #[test]
        fn exact_track_has_no_drift() {
            let mut sma: Sma<Decimal> = Sma::new(SmaConfig::new(nz(2)));
            for _ in 0..1000 {
                sma.add(dec!(0.1));
                sma.add(dec!(0.2));
            }
            assert_eq!(sma.value(), Some(dec!(0.15)));
        }
    }

    mod replace {
        use super::*;

        #[test]
        fn updates_current_observation() {
            let mut sma = sma(2);
            sma.add(10.0);
            sma.add(20.0);
            // (10 + 30) / 2
            assert_eq!(sma.replace(30.0), Some(20.0));
        }

        #[test]
        fn replace_then_restore() {
            let mut sma = sma(2);
            sma.add(10.0);
            sma.add(20.0);
            sma.replace(90.0);
            assert_eq!(sma.replace(20.0), Some(15.0));
            assert_eq!(sma.add(30.0), Some(25.0));
        }

        #[test]
        fn replace_before_any_add_is_an_add() {
            let mut sma = sma(1);
            assert_eq!(sma.replace(5.0), Some(5.0));
        }

        #[test]
        fn replace_during_filling() {
            let mut sma = sma(3);
            sma.add(10.0);
            sma.replace(15.0);
            assert_eq!(sma.add(20.0), None);
            // (15 + 20 + 30) / 3
            assert_approx!(sma.add(30.0).unwrap(), 65.0 / 3.0);
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(sma(20).to_string(), "SMA(20)");
        }
    }

    mod clone {
        use super::*;

        #[test]
        fn produces_independent_state() {
            let mut sma = sma(3);
            sma.add(10.0);
            sma.add(20.0);

            let mut cloned = sma.clone();

            assert_eq!(sma.add(30.0), Some(20.0));
            assert_eq!(cloned.value(), None);
            assert_eq!(cloned.add(90.0), Some(40.0));
        }
    }

    mod config {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn builder_requires_interval() {
            assert_eq!(
                SmaConfig::builder().build(),
                Err(ConfigError::Missing("interval"))
            );
        }

        #[test]
        fn builder_matches_shorthand() {
            let built = SmaConfig::builder().interval(nz(20)).build().unwrap();
            assert_eq!(built, SmaConfig::new(nz(20)));
        }

        #[test]
        fn display_config() {
            assert_eq!(SmaConfig::new(nz(20)).to_string(), "SmaConfig(20)");
        }

        #[test]
        fn eq_and_hash() {
            let mut set = HashSet::new();
            set.insert(SmaConfig::new(nz(20)));

            assert!(set.contains(&SmaConfig::new(nz(20))));
            assert!(!set.contains(&SmaConfig::new(nz(10))));
        }
    }

    mod value_accessor {
        use super::*;
        use crate::NotEnoughDataError;

        #[test]
        fn err_before_stable() {
            let sma = sma(3);
            assert_eq!(sma.value(), None);
            assert_eq!(sma.value_or_err(), Err(NotEnoughDataError { required: 3 }));
        }

        #[test]
        fn matches_last_update() {
            let mut sma = sma(2);
            sma.add(10.0);
            let computed = sma.add(20.0);
            assert_eq!(sma.value(), computed);
            assert_eq!(sma.value_or_err(), Ok(15.0));
        }
    }
}
