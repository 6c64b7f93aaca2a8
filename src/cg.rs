use std::{fmt::Display, num::NonZero};

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Num, Sma, SmaConfig, Window,
    indicator::require,
};

/// Configuration for the Center of Gravity oscillator ([`Cg`]).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CgConfig {
    interval: NonZero<usize>,
    signal: NonZero<usize>,
}

impl CgConfig {
    #[must_use]
    pub fn new(interval: NonZero<usize>, signal: NonZero<usize>) -> Self {
        Self { interval, signal }
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }

    /// Signal SMA length.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal.get()
    }
}

impl IndicatorConfig for CgConfig {
    type Builder = CgConfigBuilder;

    fn builder() -> Self::Builder {
        CgConfigBuilder {
            interval: None,
            signal: None,
        }
    }

    fn required_inputs(&self) -> usize {
        self.interval() + self.signal() - 1
    }
}

impl Display for CgConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CgConfig({}, {})", self.interval, self.signal)
    }
}

/// Builder for [`CgConfig`]. Both lengths must be set.
pub struct CgConfigBuilder {
    interval: Option<NonZero<usize>>,
    signal: Option<NonZero<usize>>,
}

impl CgConfigBuilder {
    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }

    #[must_use]
    pub fn signal(mut self, interval: NonZero<usize>) -> Self {
        self.signal.replace(interval);
        self
    }
}

impl IndicatorConfigBuilder<CgConfig> for CgConfigBuilder {
    fn build(self) -> Result<CgConfig, ConfigError> {
        Ok(CgConfig::new(
            require(self.interval, "interval")?,
            require(self.signal, "signal")?,
        ))
    }
}

/// Center of Gravity output: the oscillator and its signal line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CgValue<N: Num = f64> {
    cg: N,
    signal: N,
}

impl<N: Num> CgValue<N> {
    #[inline]
    #[must_use]
    pub fn cg(&self) -> N {
        self.cg
    }

    #[inline]
    #[must_use]
    pub fn signal(&self) -> N {
        self.signal
    }
}

/// Center of Gravity (CG), John Ehlers' low-lag oscillator.
///
/// Price-weighted position of the window, oldest price weighted 1:
///
/// ```text
/// CG = Σ price[i] × (i + 1) / Σ price[i]
/// ```
///
/// The signal line is an SMA of CG. A non-positive price sum gives 0.
///
/// ```
/// use streamta::{Cg, CgConfig};
/// use std::num::NonZero;
///
/// let mut cg: Cg = Cg::new(CgConfig::new(NonZero::new(2).unwrap(), NonZero::new(1).unwrap()));
/// cg.add(1.0);
/// // (1 × 1 + 3 × 2) / 4
/// assert_eq!(cg.add(3.0).unwrap().cg(), 1.75);
/// ```
#[derive(Clone, Debug)]
pub struct Cg<N: Num = f64> {
    config: CgConfig,
    prices: Window<N>,
    signal: Sma<N>,
    current: Option<CgValue<N>>,
}

impl<N: Num> Cg<N> {
    fn center(&self) -> N {
        let (weighted, total) = self
            .prices
            .iter()
            .enumerate()
            .fold((N::ZERO, N::ZERO), |(weighted, total), (i, &price)| {
                (weighted + price * N::from_usize(i + 1), total + price)
            });

        if total > N::ZERO {
            weighted / total
        } else {
            N::ZERO
        }
    }
}

impl<N: Num> Indicator for Cg<N> {
    type Config = CgConfig;
    type Input = N;
    type Output = CgValue<N>;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            prices: Window::new(config.interval()),
            signal: Sma::new(SmaConfig::new(config.signal)),
            current: None,
        }
    }

    fn config(&self) -> &CgConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<CgValue<N>> {
        let replace_signal = replace && self.prices.is_full();

        self.prices.push_update(replace, price);
        if !self.prices.is_full() {
            self.current = None;
            return None;
        }

        let cg = self.center();
        self.current = self
            .signal
            .update(cg, replace_signal)
            .map(|signal| CgValue { cg, signal });
        self.current
    }

    fn value(&self) -> Option<CgValue<N>> {
        self.current
    }
}

impl<N: Num> Display for Cg<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CG({}, {})", self.config.interval, self.config.signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_rounded, nz};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn cg(interval: usize, signal: usize) -> Cg {
        Cg::new(CgConfig::new(nz(interval), nz(signal)))
    }

    fn rising() -> [f64; 11] {
        [
            100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0, 170.0, 180.0, 190.0, 200.0,
        ]
    }

    #[test]
    fn stable_once_signal_fills() {
        let mut cg = cg(5, 6);
        for price in [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0] {
            cg.add(price);
            assert!(!cg.is_stable());
        }
        cg.add(100.0);
        assert!(cg.is_stable());
        assert_eq!(cg.required_inputs(), 10);
    }

    #[test]
    fn replace_then_restore() {
        let mut cg = cg(5, 3);
        cg.updates(rising(), false);

        // [170, 180, 190, 200, 200]
        assert_rounded!(cg.add(200.0).unwrap().cg(), 3.0851, 4);
        assert_rounded!(cg.replace(900.0).unwrap().cg(), 3.9024, 4);
        assert_rounded!(cg.replace(200.0).unwrap().cg(), 3.0851, 4);
    }

    #[test]
    fn falling_prices_with_signal() {
        let mut cg = cg(5, 3);
        cg.updates(rising(), false);
        cg.updates([150.0, 110.0, 90.0, 130.0], false);

        let value = cg.value().unwrap();
        assert_rounded!(value.cg(), 2.7059, 4);
        assert_rounded!(value.signal(), 2.6990, 4);
    }

    #[test]
    fn zero_prices_give_zero() {
        let mut cg: Cg<Decimal> = Cg::new(CgConfig::new(nz(1), nz(1)));
        assert_eq!(cg.add(dec!(0)).map(|v| v.cg()), Some(dec!(0)));
    }

    #[test]
    fn builder_requires_signal() {
        assert_eq!(
            CgConfig::builder().interval(nz(5)).build(),
            Err(ConfigError::Missing("signal"))
        );
    }

    #[test]
    fn display() {
        assert_eq!(cg(10, 20).to_string(), "CG(10, 20)");
    }
}
