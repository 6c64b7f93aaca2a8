use std::{fmt::Display, num::NonZero};

use tracing::trace;

use crate::{
    Candle, ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Num, Sma, SmaConfig,
    Window, indicator::require,
};

/// Configuration for the Stochastic Oscillator ([`Stoch`]).
///
/// `%K` is smoothed over `k_interval` and `%D` is fed `%K`, so the warm-up
/// chains all three lengths:
///
/// ```
/// use streamta::{IndicatorConfig, StochConfig};
/// use std::num::NonZero;
///
/// let nz = |n| NonZero::new(n).unwrap();
/// let config = StochConfig::new(nz(5), nz(3), nz(3));
/// assert_eq!(config.required_inputs(), 9);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StochConfig {
    interval: NonZero<usize>,
    k_interval: NonZero<usize>,
    d_interval: NonZero<usize>,
}

impl StochConfig {
    #[must_use]
    pub fn new(
        interval: NonZero<usize>,
        k_interval: NonZero<usize>,
        d_interval: NonZero<usize>,
    ) -> Self {
        Self {
            interval,
            k_interval,
            d_interval,
        }
    }

    /// Look-back for the highest high and lowest low.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }

    /// SMA length applied to the raw `%K`.
    #[inline]
    #[must_use]
    pub fn k_interval(&self) -> usize {
        self.k_interval.get()
    }

    /// SMA length applied to `%K` to form `%D`.
    #[inline]
    #[must_use]
    pub fn d_interval(&self) -> usize {
        self.d_interval.get()
    }
}

impl IndicatorConfig for StochConfig {
    type Builder = StochConfigBuilder;

    fn builder() -> Self::Builder {
        StochConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval() + self.k_interval() + self.d_interval() - 2
    }
}

impl Display for StochConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StochConfig({}, {}, {})",
            self.interval, self.k_interval, self.d_interval
        )
    }
}

/// Builder for [`StochConfig`].
///
/// Defaults: `%K` and `%D` smoothing of 3. The interval must be set.
pub struct StochConfigBuilder {
    interval: Option<NonZero<usize>>,
    k_interval: NonZero<usize>,
    d_interval: NonZero<usize>,
}

impl StochConfigBuilder {
    fn new() -> Self {
        let three = NonZero::<usize>::MIN.saturating_add(2);
        Self {
            interval: None,
            k_interval: three,
            d_interval: three,
        }
    }

    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }

    #[must_use]
    pub fn k_interval(mut self, interval: NonZero<usize>) -> Self {
        self.k_interval = interval;
        self
    }

    #[must_use]
    pub fn d_interval(mut self, interval: NonZero<usize>) -> Self {
        self.d_interval = interval;
        self
    }
}

impl IndicatorConfigBuilder<StochConfig> for StochConfigBuilder {
    fn build(self) -> Result<StochConfig, ConfigError> {
        Ok(StochConfig::new(
            require(self.interval, "interval")?,
            self.k_interval,
            self.d_interval,
        ))
    }
}

/// Stochastic Oscillator output: smoothed `%K` and its signal line `%D`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StochValue<N: Num = f64> {
    k: N,
    d: N,
}

impl<N: Num> StochValue<N> {
    #[inline]
    #[must_use]
    pub fn k(&self) -> N {
        self.k
    }

    #[inline]
    #[must_use]
    pub fn d(&self) -> N {
        self.d
    }
}

/// Stochastic Oscillator (STOCH).
///
/// Where the close sits inside the recent high-low range, on a 0 to 100
/// scale:
///
/// ```text
/// fast %K = (close − lowest_low) × 100 / (highest_high − lowest_low)
/// %K      = SMA(fast %K, k_interval)
/// %D      = SMA(%K, d_interval)
/// ```
///
/// A window without range divides by 1 instead, which keeps a flat market
/// at the bottom of the scale.
#[derive(Clone, Debug)]
pub struct Stoch<N: Num = f64> {
    config: StochConfig,
    candles: Window<Candle<N>>,
    k: Sma<N>,
    d: Sma<N>,
    current: Option<StochValue<N>>,
}

impl<N: Num> Indicator for Stoch<N> {
    type Config = StochConfig;
    type Input = Candle<N>;
    type Output = StochValue<N>;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            candles: Window::new(config.interval()),
            k: Sma::new(SmaConfig::new(config.k_interval)),
            d: Sma::new(SmaConfig::new(config.d_interval)),
            current: None,
        }
    }

    fn config(&self) -> &StochConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<StochValue<N>> {
        let replace_k = replace && self.candles.is_full();
        let replace_d = replace && self.k.is_stable();

        self.candles.push_update(replace, candle);
        if !self.candles.is_full() {
            self.current = None;
            return None;
        }

        let (highest, lowest) = self.candles.iter().fold(
            (candle.high, candle.low),
            |(highest, lowest), bar| (highest.max(bar.high), lowest.min(bar.low)),
        );

        let range = highest - lowest;
        let divisor = if range.is_zero() {
            trace!(%highest, "stoch: no range in window, dividing by one");
            N::ONE
        } else {
            range
        };
        let fast_k = (candle.close - lowest) * N::HUNDRED / divisor;

        self.current = self.k.update(fast_k, replace_k).and_then(|k| {
            self.d
                .update(k, replace_d)
                .map(|d| StochValue { k, d })
        });
        self.current
    }

    fn value(&self) -> Option<StochValue<N>> {
        self.current
    }
}

impl<N: Num> Display for Stoch<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "STOCH({}, {}, {})",
            self.config.interval, self.config.k_interval, self.config.d_interval
        )
    }
}
