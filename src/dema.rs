use std::{fmt::Display, num::NonZero};

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Num, Seed, ema::Smoother,
    indicator::require,
};

/// Configuration for the Double Exponential Moving Average ([`Dema`]).
///
/// With [`Seed::Sma`] the outer EMA only starts once the inner one is stable,
/// so `2 × interval − 1` inputs are required. With [`Seed::First`] both
/// recursions start at the first input and `interval` inputs suffice.
///
/// ```
/// use streamta::{DemaConfig, IndicatorConfig, Seed};
/// use std::num::NonZero;
///
/// let interval = NonZero::new(10).unwrap();
/// assert_eq!(DemaConfig::new(interval).required_inputs(), 19);
/// assert_eq!(DemaConfig::first_seeded(interval).required_inputs(), 10);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemaConfig {
    interval: NonZero<usize>,
    seed: Seed,
}

impl IndicatorConfig for DemaConfig {
    type Builder = DemaConfigBuilder;

    fn builder() -> Self::Builder {
        DemaConfigBuilder {
            interval: None,
            seed: Seed::Sma,
        }
    }

    fn required_inputs(&self) -> usize {
        match self.seed {
            Seed::Sma => 2 * self.interval.get() - 1,
            Seed::First => self.interval.get(),
        }
    }
}

impl DemaConfig {
    #[must_use]
    pub fn new(interval: NonZero<usize>) -> Self {
        Self {
            interval,
            seed: Seed::Sma,
        }
    }

    #[must_use]
    pub fn first_seeded(interval: NonZero<usize>) -> Self {
        Self {
            interval,
            seed: Seed::First,
        }
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }

    #[inline]
    #[must_use]
    pub fn seed(&self) -> Seed {
        self.seed
    }
}

impl Display for DemaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DemaConfig({}, {})", self.interval, self.seed)
    }
}

/// Builder for [`DemaConfig`].
///
/// Defaults: seed = [`Seed::Sma`]. The interval must be set.
pub struct DemaConfigBuilder {
    interval: Option<NonZero<usize>>,
    seed: Seed,
}

impl DemaConfigBuilder {
    #[inline]
    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }

    #[inline]
    #[must_use]
    pub fn seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }
}

impl IndicatorConfigBuilder<DemaConfig> for DemaConfigBuilder {
    fn build(self) -> Result<DemaConfig, ConfigError> {
        Ok(DemaConfig {
            interval: require(self.interval, "interval")?,
            seed: self.seed,
        })
    }
}

/// Double Exponential Moving Average (DEMA).
///
/// ```text
/// DEMA = 2 × EMA(price) − EMA(EMA(price))
/// ```
///
/// Reduces the lag of a plain EMA. Stable once the outer EMA is stable.
///
/// # Example
///
/// ```
/// use streamta::{Dema, DemaConfig};
/// use std::num::NonZero;
///
/// let mut dema: Dema = Dema::new(DemaConfig::new(NonZero::new(2).unwrap()));
/// assert_eq!(dema.add(1.0), None);
/// assert_eq!(dema.add(3.0), None);
/// assert!(dema.add(5.0).is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Dema<N: Num = f64> {
    config: DemaConfig,
    inner: Smoother<N>,
    outer: Smoother<N>,
}

impl<N: Num> Dema<N> {
    /// Current double-smoothed recursion value. Equal to
    /// [`value`](Dema::value) with [`Seed::Sma`]; available from the first
    /// input with [`Seed::First`].
    #[must_use]
    pub fn estimate(&self) -> Option<N> {
        let inner = self.inner.estimate()?;
        let outer = self.outer.estimate()?;
        Some(inner + inner - outer)
    }
}

impl<N: Num> Indicator for Dema<N> {
    type Config = DemaConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            inner: Smoother::exponential(config.interval, config.seed),
            outer: Smoother::exponential(config.interval, config.seed),
        }
    }

    fn config(&self) -> &DemaConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        self.inner.update(price, replace);

        if let Some(inner) = self.inner.estimate() {
            self.outer.update(inner, replace);
        }

        self.value()
    }

    fn value(&self) -> Option<N> {
        let outer = self.outer.value()?;
        let inner = self.inner.estimate()?;
        Some(inner + inner - outer)
    }
}

impl<N: Num> Display for Dema<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DEMA({}, {})", self.config.interval, self.config.seed)
    }
}
