use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Num, Register, Sma,
    SmaConfig, indicator::require,
};

/// How a recursive smoother obtains its first value.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Seed {
    /// The first value is the simple average of the first `interval`
    /// observations (the standard warm-up).
    #[default]
    Sma,
    /// The recursion starts at the first observation; the value stays hidden
    /// until `interval` observations have been seen. Matches Tulip
    /// Indicators.
    First,
}

impl Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Recursive smoothing core shared by EMA, WSMA and RMA:
/// `next = prev + α × (price − prev)`.
#[derive(Clone, Debug)]
pub(crate) struct Smoother<N: Num> {
    interval: usize,
    seed: Seed,
    alpha: N,
    warmup: Sma<N>,
    count: usize,
    estimate: Register<N>,
}

impl<N: Num> Smoother<N> {
    /// `α = 2 / (interval + 1)`.
    pub(crate) fn exponential(interval: NonZero<usize>, seed: Seed) -> Self {
        let alpha = (N::ONE + N::ONE) / N::from_usize(interval.get() + 1);
        Self::with_alpha(interval, seed, alpha)
    }

    /// Wilder's `α = 1 / interval`.
    pub(crate) fn wilder(interval: NonZero<usize>, seed: Seed) -> Self {
        let alpha = N::ONE / N::from_usize(interval.get());
        Self::with_alpha(interval, seed, alpha)
    }

    fn with_alpha(interval: NonZero<usize>, seed: Seed, alpha: N) -> Self {
        Self {
            interval: interval.get(),
            seed,
            alpha,
            warmup: Sma::new(SmaConfig::new(interval)),
            count: 0,
            estimate: Register::default(),
        }
    }

    #[inline]
    pub(crate) fn update(&mut self, price: N, replace: bool) -> Option<N> {
        let replace = replace && self.count > 0;
        if !replace {
            self.count += 1;
        }

        let next = match self.seed {
            Seed::Sma if self.count <= self.interval => self.warmup.update(price, replace),
            Seed::Sma => self.step(price, replace),
            Seed::First => self.step(price, replace).or(Some(price)),
        };

        match next {
            Some(value) => self.estimate.set(value, replace),
            None => self.estimate.clear(replace),
        }

        self.value()
    }

    #[inline]
    fn step(&self, price: N, replace: bool) -> Option<N> {
        self.estimate
            .base(replace)
            .map(|prev| prev + self.alpha * (price - prev))
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<N> {
        if self.count >= self.interval {
            self.estimate.get()
        } else {
            None
        }
    }

    /// Current recursion value, visible before stability for
    /// [`Seed::First`].
    #[inline]
    pub(crate) fn estimate(&self) -> Option<N> {
        match self.seed {
            Seed::Sma => self.value(),
            Seed::First => self.estimate.get(),
        }
    }
}

/// Configuration for the Exponential Moving Average ([`Ema`]) indicator.
///
/// # Example
///
/// ```
/// use streamta::{EmaConfig, IndicatorConfig, IndicatorConfigBuilder, Seed};
/// use std::num::NonZero;
///
/// let config = EmaConfig::builder()
///     .interval(NonZero::new(20).unwrap())
///     .seed(Seed::First)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.interval(), 20);
/// assert_eq!(config.required_inputs(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmaConfig {
    interval: NonZero<usize>,
    seed: Seed,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn required_inputs(&self) -> usize {
        self.interval.get()
    }
}

impl EmaConfig {
    /// EMA seeded by the SMA of the first `interval` observations.
    #[must_use]
    pub fn new(interval: NonZero<usize>) -> Self {
        Self {
            interval,
            seed: Seed::Sma,
        }
    }

    /// EMA whose recursion starts at the first observation.
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

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.interval, self.seed)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: seed = [`Seed::Sma`].
/// The interval must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    interval: Option<NonZero<usize>>,
    seed: Seed,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            interval: None,
            seed: Seed::Sma,
        }
    }

    /// Sets the smoothing interval.
    #[inline]
    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }

    /// Sets how the first value is obtained.
    #[inline]
    #[must_use]
    pub fn seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn build(self) -> Result<EmaConfig, ConfigError> {
        Ok(EmaConfig {
            interval: require(self.interval, "interval")?,
            seed: self.seed,
        })
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// observations. Uses the standard smoothing factor
/// `α = 2 / (interval + 1)`. Each value is computed as:
///
/// ```text
/// EMA = prev_EMA + α × (price − prev_EMA)
/// ```
///
/// With [`Seed::Sma`] (the default) the first `interval` observations are
/// collected to compute an SMA seed, which is the first value. With
/// [`Seed::First`] the recursion starts at the first observation and values
/// are reported from the `interval`-th observation on.
///
/// A replace recomputes from the previous EMA without advancing state.
///
/// # Example
///
/// ```
/// use streamta::{Ema, EmaConfig};
/// use std::num::NonZero;
///
/// let mut ema: Ema = Ema::new(EmaConfig::new(NonZero::new(3).unwrap()));
///
/// // Seeding phase: collecting SMA
/// assert_eq!(ema.add(2.0), None);
/// assert_eq!(ema.add(4.0), None);
///
/// // SMA seed = (2 + 4 + 6) / 3 = 4.0
/// assert_eq!(ema.add(6.0), Some(4.0));
///
/// // EMA(3) α = 0.5: 4 + 0.5 × (8 − 4) = 6.0
/// assert_eq!(ema.add(8.0), Some(6.0));
/// ```
#[derive(Clone, Debug)]
pub struct Ema<N: Num = f64> {
    config: EmaConfig,
    smoother: Smoother<N>,
}

impl<N: Num> Ema<N> {
    /// Current recursion value. Equal to [`value`](Ema::value) with
    /// [`Seed::Sma`]; with [`Seed::First`] it is available from the first
    /// observation, before the EMA is considered stable.
    #[inline]
    #[must_use]
    pub fn estimate(&self) -> Option<N> {
        self.smoother.estimate()
    }
}

impl<N: Num> Indicator for Ema<N> {
    type Config = EmaConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            smoother: Smoother::exponential(config.interval, config.seed),
            config,
        }
    }

    #[inline]
    fn config(&self) -> &EmaConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        self.smoother.update(price, replace)
    }

    #[inline]
    fn value(&self) -> Option<N> {
        self.smoother.value()
    }
}

impl<N: Num> Display for Ema<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.interval, self.config.seed)
    }
}
