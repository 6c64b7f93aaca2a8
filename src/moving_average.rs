use std::{fmt::Display, num::NonZero};

use crate::{
    ConfigError, Dema, DemaConfig, Ema, EmaConfig, Indicator, IndicatorConfig,
    IndicatorConfigBuilder, Num, Rma, RmaConfig, Sma, SmaConfig, Spencer, SpencerConfig, Wma,
    WmaConfig, Wsma, WsmaConfig, indicator::require,
};

/// Moving average family used where an indicator's smoothing is pluggable.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Smoothing {
    Sma,
    Ema,
    Dema,
    Wsma,
    Rma,
    Wma,
    /// Fixed 15-point kernel; ignores the interval.
    Spencer,
}

impl Smoothing {
    /// Inputs a moving average of this kind needs over `interval`.
    #[must_use]
    pub fn required_inputs(self, interval: NonZero<usize>) -> usize {
        match self {
            Self::Dema => DemaConfig::new(interval).required_inputs(),
            Self::Spencer => SpencerConfig.required_inputs(),
            Self::Sma | Self::Ema | Self::Wsma | Self::Rma | Self::Wma => interval.get(),
        }
    }
}

impl Display for Smoothing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Configuration for [`MovingAverage`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovingAverageConfig {
    smoothing: Smoothing,
    interval: NonZero<usize>,
}

impl MovingAverageConfig {
    #[must_use]
    pub fn new(smoothing: Smoothing, interval: NonZero<usize>) -> Self {
        Self {
            smoothing,
            interval,
        }
    }

    #[inline]
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }
}

impl IndicatorConfig for MovingAverageConfig {
    type Builder = MovingAverageConfigBuilder;

    fn builder() -> Self::Builder {
        MovingAverageConfigBuilder {
            smoothing: Smoothing::Sma,
            interval: None,
        }
    }

    fn required_inputs(&self) -> usize {
        self.smoothing.required_inputs(self.interval)
    }
}

impl Display for MovingAverageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MovingAverageConfig({}, {})",
            self.smoothing, self.interval
        )
    }
}

/// Builder for [`MovingAverageConfig`].
///
/// Defaults: smoothing = [`Smoothing::Sma`]. The interval must be set.
pub struct MovingAverageConfigBuilder {
    smoothing: Smoothing,
    interval: Option<NonZero<usize>>,
}

impl MovingAverageConfigBuilder {
    #[must_use]
    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }
}

impl IndicatorConfigBuilder<MovingAverageConfig> for MovingAverageConfigBuilder {
    fn build(self) -> Result<MovingAverageConfig, ConfigError> {
        Ok(MovingAverageConfig::new(
            self.smoothing,
            require(self.interval, "interval")?,
        ))
    }
}

/// A moving average whose family is chosen at runtime.
///
/// ```
/// use streamta::{MovingAverage, MovingAverageConfig, Smoothing};
/// use std::num::NonZero;
///
/// let config = MovingAverageConfig::new(Smoothing::Wma, NonZero::new(2).unwrap());
/// let mut ma: MovingAverage = MovingAverage::new(config);
/// ma.add(3.0);
/// assert_eq!(ma.add(6.0), Some(5.0));
/// ```
#[derive(Clone, Debug)]
pub struct MovingAverage<N: Num = f64> {
    config: MovingAverageConfig,
    inner: Inner<N>,
}

#[derive(Clone, Debug)]
enum Inner<N: Num> {
    Sma(Sma<N>),
    Ema(Ema<N>),
    Dema(Dema<N>),
    Wsma(Wsma<N>),
    Rma(Rma<N>),
    Wma(Wma<N>),
    Spencer(Spencer<N>),
}

macro_rules! dispatch {
    ($inner:expr, $ma:ident => $body:expr) => {
        match $inner {
            Inner::Sma($ma) => $body,
            Inner::Ema($ma) => $body,
            Inner::Dema($ma) => $body,
            Inner::Wsma($ma) => $body,
            Inner::Rma($ma) => $body,
            Inner::Wma($ma) => $body,
            Inner::Spencer($ma) => $body,
        }
    };
}

impl<N: Num> Indicator for MovingAverage<N> {
    type Config = MovingAverageConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        let interval = config.interval;
        let inner = match config.smoothing {
            Smoothing::Sma => Inner::Sma(Sma::new(SmaConfig::new(interval))),
            Smoothing::Ema => Inner::Ema(Ema::new(EmaConfig::new(interval))),
            Smoothing::Dema => Inner::Dema(Dema::new(DemaConfig::new(interval))),
            Smoothing::Wsma => Inner::Wsma(Wsma::new(WsmaConfig::new(interval))),
            Smoothing::Rma => Inner::Rma(Rma::new(RmaConfig::new(interval))),
            Smoothing::Wma => Inner::Wma(Wma::new(WmaConfig::new(interval))),
            Smoothing::Spencer => Inner::Spencer(Spencer::new(SpencerConfig)),
        };

        Self { config, inner }
    }

    fn config(&self) -> &MovingAverageConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        dispatch!(&mut self.inner, ma => ma.update(price, replace))
    }

    #[inline]
    fn value(&self) -> Option<N> {
        dispatch!(&self.inner, ma => ma.value())
    }
}

impl<N: Num> Display for MovingAverage<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        dispatch!(&self.inner, ma => Display::fmt(ma, f))
    }
}
