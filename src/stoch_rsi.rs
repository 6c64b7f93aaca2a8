use std::{fmt::Display, num::NonZero};

use tracing::trace;

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Num, Period, PeriodConfig,
    Rsi, RsiConfig, Sma, SmaConfig, Smoothing, indicator::require,
};

/// Configuration for the Stochastic RSI ([`StochRsi`]).
///
/// The same interval drives the RSI and the min/max window over its values.
///
/// ```
/// use streamta::{IndicatorConfig, StochRsiConfig};
/// use std::num::NonZero;
///
/// // 6 prices for the first RSI(5), 4 more to fill the window
/// let config = StochRsiConfig::new(NonZero::new(5).unwrap());
/// assert_eq!(config.required_inputs(), 10);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StochRsiConfig {
    interval: NonZero<usize>,
    smoothing: Smoothing,
    k_interval: NonZero<usize>,
    d_interval: NonZero<usize>,
}

impl StochRsiConfig {
    /// Wilder-smoothed RSI, `%K` and `%D` as 3-period SMAs.
    #[must_use]
    pub fn new(interval: NonZero<usize>) -> Self {
        let three = NonZero::<usize>::MIN.saturating_add(2);
        Self {
            interval,
            smoothing: Smoothing::Wsma,
            k_interval: three,
            d_interval: three,
        }
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }

    /// Settings of the underlying RSI.
    #[inline]
    #[must_use]
    pub fn rsi(&self) -> RsiConfig {
        RsiConfig::new(self.interval).with_smoothing(self.smoothing)
    }

    #[inline]
    #[must_use]
    pub fn k_interval(&self) -> usize {
        self.k_interval.get()
    }

    #[inline]
    #[must_use]
    pub fn d_interval(&self) -> usize {
        self.d_interval.get()
    }
}

impl IndicatorConfig for StochRsiConfig {
    type Builder = StochRsiConfigBuilder;

    fn builder() -> Self::Builder {
        StochRsiConfigBuilder::new()
    }

    /// Counts up to the first raw value; `%K` and `%D` warm up after it.
    fn required_inputs(&self) -> usize {
        self.rsi().required_inputs() + self.interval() - 1
    }
}

impl Display for StochRsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StochRsiConfig({}, {}, {}, {})",
            self.interval, self.smoothing, self.k_interval, self.d_interval
        )
    }
}

/// Builder for [`StochRsiConfig`].
///
/// Defaults: RSI smoothing [`Smoothing::Wsma`], `%K` and `%D` lengths of 3.
/// The interval must be set.
pub struct StochRsiConfigBuilder {
    interval: Option<NonZero<usize>>,
    smoothing: Smoothing,
    k_interval: NonZero<usize>,
    d_interval: NonZero<usize>,
}

impl StochRsiConfigBuilder {
    fn new() -> Self {
        let three = NonZero::<usize>::MIN.saturating_add(2);
        Self {
            interval: None,
            smoothing: Smoothing::Wsma,
            k_interval: three,
            d_interval: three,
        }
    }

    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }

    /// Smoothing of the underlying RSI.
    #[must_use]
    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
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

impl IndicatorConfigBuilder<StochRsiConfig> for StochRsiConfigBuilder {
    fn build(self) -> Result<StochRsiConfig, ConfigError> {
        Ok(StochRsiConfig {
            interval: require(self.interval, "interval")?,
            smoothing: self.smoothing,
            k_interval: self.k_interval,
            d_interval: self.d_interval,
        })
    }
}

/// Stochastic RSI (STOCHRSI).
///
/// The stochastic formula applied to RSI values instead of prices, on a 0 to
/// 1 scale:
///
/// ```text
/// StochRSI = (RSI − min(RSI)) / (max(RSI) − min(RSI))
/// ```
///
/// Steeper than the RSI and often pinned at the extremes. When every RSI in
/// the window is equal the result saturates to 1.
///
/// [`k`](StochRsi::k) smooths the raw value and [`d`](StochRsi::d) smooths
/// `%K`; both come later than the raw value.
#[derive(Clone, Debug)]
pub struct StochRsi<N: Num = f64> {
    config: StochRsiConfig,
    rsi: Rsi<N>,
    period: Period<N>,
    k: Sma<N>,
    d: Sma<N>,
    current: Option<N>,
}

impl<N: Num> StochRsi<N> {
    /// `%K` line, an SMA of the raw value.
    #[must_use]
    pub fn k(&self) -> Option<N> {
        self.k.value()
    }

    /// `%D` line, an SMA of `%K`.
    #[must_use]
    pub fn d(&self) -> Option<N> {
        self.d.value()
    }
}

impl<N: Num> Indicator for StochRsi<N> {
    type Config = StochRsiConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            rsi: Rsi::new(config.rsi()),
            period: Period::new(PeriodConfig::new(config.interval)),
            k: Sma::new(SmaConfig::new(config.k_interval)),
            d: Sma::new(SmaConfig::new(config.d_interval)),
            current: None,
        }
    }

    fn config(&self) -> &StochRsiConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        let replace_period = replace && self.rsi.is_stable();
        let replace_k = replace && self.current.is_some();
        let replace_d = replace && self.k.is_stable();

        self.current = self.rsi.update(price, replace).and_then(|rsi| {
            let period = self.period.update(rsi, replace_period)?;
            Some((rsi - period.lowest()).checked_div(period.range()).unwrap_or_else(|| {
                trace!(%rsi, "stoch rsi: no range in window, saturating");
                N::ONE
            }))
        });

        if let Some(value) = self.current
            && let Some(k) = self.k.update(value, replace_k)
        {
            self.d.update(k, replace_d);
        }

        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Display for StochRsi<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "STOCHRSI({})", self.config.interval)
    }
}
