use std::fmt::Display;

use crate::{Indicator, IndicatorConfig, Num, Seed, ema::Smoother};

interval_config!(
    /// Configuration for Wilder's Smoothed Moving Average ([`Wsma`]).
    ///
    /// ```
    /// use streamta::{IndicatorConfig, WsmaConfig};
    /// use std::num::NonZero;
    ///
    /// let config = WsmaConfig::new(NonZero::new(14).unwrap());
    /// assert_eq!(config.required_inputs(), 14);
    /// ```
    WsmaConfig,
    WsmaConfigBuilder
);

interval_config!(
    /// Configuration for the Relative Moving Average ([`Rma`]).
    RmaConfig,
    RmaConfigBuilder
);

impl IndicatorConfig for WsmaConfig {
    type Builder = WsmaConfigBuilder;

    fn builder() -> Self::Builder {
        WsmaConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval()
    }
}

impl IndicatorConfig for RmaConfig {
    type Builder = RmaConfigBuilder;

    fn builder() -> Self::Builder {
        RmaConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval()
    }
}

/// Wilder's Smoothed Moving Average (WSMA).
///
/// Recursive smoothing with `α = 1 / interval`, seeded by the simple average
/// of the first `interval` observations. Default smoothing of [`Rsi`] and
/// [`Atr`].
///
/// [`Rsi`]: crate::Rsi
/// [`Atr`]: crate::Atr
///
/// ```
/// use streamta::{Wsma, WsmaConfig};
/// use std::num::NonZero;
///
/// let mut wsma: Wsma = Wsma::new(WsmaConfig::new(NonZero::new(2).unwrap()));
/// wsma.add(2.0);
/// assert_eq!(wsma.add(4.0), Some(3.0));
/// // 3 + (5 − 3) / 2
/// assert_eq!(wsma.add(5.0), Some(4.0));
/// ```
#[derive(Clone, Debug)]
pub struct Wsma<N: Num = f64> {
    config: WsmaConfig,
    smoother: Smoother<N>,
}

impl<N: Num> Indicator for Wsma<N> {
    type Config = WsmaConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            smoother: Smoother::wilder(config.interval, Seed::Sma),
            config,
        }
    }

    fn config(&self) -> &WsmaConfig {
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

impl<N: Num> Display for Wsma<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WSMA({})", self.config.interval)
    }
}

/// Relative Moving Average (RMA).
///
/// Wilder smoothing (`α = 1 / interval`) whose recursion starts at the first
/// observation, as used by `TradingView`'s `ta.rma`. Values are reported from
/// the `interval`-th observation on.
#[derive(Clone, Debug)]
pub struct Rma<N: Num = f64> {
    config: RmaConfig,
    smoother: Smoother<N>,
}

impl<N: Num> Indicator for Rma<N> {
    type Config = RmaConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            smoother: Smoother::wilder(config.interval, Seed::First),
            config,
        }
    }

    fn config(&self) -> &RmaConfig {
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

impl<N: Num> Display for Rma<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RMA({})", self.config.interval)
    }
}
