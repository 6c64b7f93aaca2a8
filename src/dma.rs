use std::{fmt::Display, num::NonZero};

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, MovingAverage,
    MovingAverageConfig, Num, Smoothing, indicator::require,
};

/// Configuration for the Dual Moving Average ([`Dma`]).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DmaConfig {
    short: NonZero<usize>,
    long: NonZero<usize>,
    smoothing: Smoothing,
}

impl DmaConfig {
    /// SMA pair. Use the builder to validate the order or pick another
    /// smoothing.
    #[must_use]
    pub fn new(short: NonZero<usize>, long: NonZero<usize>) -> Self {
        Self {
            short,
            long,
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

impl IndicatorConfig for DmaConfig {
    type Builder = DmaConfigBuilder;

    fn builder() -> Self::Builder {
        DmaConfigBuilder {
            short: None,
            long: None,
            smoothing: Smoothing::Sma,
        }
    }

    fn required_inputs(&self) -> usize {
        self.smoothing
            .required_inputs(self.short)
            .max(self.smoothing.required_inputs(self.long))
    }
}

impl Display for DmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DmaConfig({}, {}, {})",
            self.short, self.long, self.smoothing
        )
    }
}

/// Builder for [`DmaConfig`].
///
/// Defaults: [`Smoothing::Sma`]. Both intervals must be set and short must be
/// less than long.
pub struct DmaConfigBuilder {
    short: Option<NonZero<usize>>,
    long: Option<NonZero<usize>>,
    smoothing: Smoothing,
}

impl DmaConfigBuilder {
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

impl IndicatorConfigBuilder<DmaConfig> for DmaConfigBuilder {
    fn build(self) -> Result<DmaConfig, ConfigError> {
        let short = require(self.short, "short")?;
        let long = require(self.long, "long")?;

        if short >= long {
            return Err(ConfigError::IntervalOrder {
                short: short.get(),
                long: long.get(),
            });
        }

        Ok(DmaConfig {
            short,
            long,
            smoothing: self.smoothing,
        })
    }
}

/// Both averages of a [`Dma`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DmaValue<N: Num = f64> {
    short: N,
    long: N,
}

impl<N: Num> DmaValue<N> {
    #[inline]
    #[must_use]
    pub fn short(&self) -> N {
        self.short
    }

    #[inline]
    #[must_use]
    pub fn long(&self) -> N {
        self.long
    }
}

/// Dual Moving Average (DMA).
///
/// A short and a long moving average of the same series, reported together
/// once both exist. The short one crossing above the long one reads as an
/// uptrend.
///
/// ```
/// use streamta::{Dma, DmaConfig};
/// use std::num::NonZero;
///
/// let nz = |n| NonZero::new(n).unwrap();
/// let mut dma: Dma = Dma::new(DmaConfig::new(nz(1), nz(2)));
/// dma.add(10.0);
/// let value = dma.add(20.0).unwrap();
/// assert_eq!((value.short(), value.long()), (20.0, 15.0));
/// ```
#[derive(Clone, Debug)]
pub struct Dma<N: Num = f64> {
    config: DmaConfig,
    short: MovingAverage<N>,
    long: MovingAverage<N>,
    current: Option<DmaValue<N>>,
}

impl<N: Num> Indicator for Dma<N> {
    type Config = DmaConfig;
    type Input = N;
    type Output = DmaValue<N>;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            short: MovingAverage::new(MovingAverageConfig::new(config.smoothing, config.short)),
            long: MovingAverage::new(MovingAverageConfig::new(config.smoothing, config.long)),
            current: None,
        }
    }

    fn config(&self) -> &DmaConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<DmaValue<N>> {
        let short = self.short.update(price, replace);
        let long = self.long.update(price, replace);

        self.current = short
            .zip(long)
            .map(|(short, long)| DmaValue { short, long });
        self.current
    }

    fn value(&self) -> Option<DmaValue<N>> {
        self.current
    }
}

impl<N: Num> Display for Dma<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DMA({}, {}, {})",
            self.config.short, self.config.long, self.config.smoothing
        )
    }
}
