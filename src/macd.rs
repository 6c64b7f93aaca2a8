use std::{fmt::Display, num::NonZero};

use crate::{
    ConfigError, Dema, DemaConfig, Ema, EmaConfig, Indicator, IndicatorConfig,
    IndicatorConfigBuilder, Num, Seed, Signal, Signaling, TrendSignal, indicator::require,
    signal::SignalState,
};

/// Smoothing used for the MACD lines.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MacdSmoothing {
    #[default]
    Ema,
    Dema,
}

impl Display for MacdSmoothing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Configuration for the Moving Average Convergence Divergence ([`Macd`]).
///
/// The MACD line is available once the long line is stable. The signal line
/// then starts from the first MACD value: with [`Seed::First`] (the default)
/// it is read immediately, with [`Seed::Sma`] it needs its own warm-up.
///
/// # Example
///
/// ```
/// use streamta::{IndicatorConfig, IndicatorConfigBuilder, MacdConfig, Seed};
/// use std::num::NonZero;
///
/// let config = MacdConfig::default_12_26_9();
/// assert_eq!(config.required_inputs(), 26);
///
/// let warmed = MacdConfig::builder().seed(Seed::Sma).build().unwrap();
/// assert_eq!(warmed.required_inputs(), 26 + 9 - 1);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacdConfig {
    short: NonZero<usize>,
    long: NonZero<usize>,
    signal: NonZero<usize>,
    smoothing: MacdSmoothing,
    seed: Seed,
}

impl MacdConfig {
    /// MACD(12, 26, 9) with EMA lines.
    #[must_use]
    pub fn default_12_26_9() -> Self {
        Self {
            short: NonZero::<usize>::MIN.saturating_add(11),
            long: NonZero::<usize>::MIN.saturating_add(25),
            signal: NonZero::<usize>::MIN.saturating_add(8),
            smoothing: MacdSmoothing::Ema,
            seed: Seed::First,
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
    pub fn signal(&self) -> usize {
        self.signal.get()
    }

    #[inline]
    #[must_use]
    pub fn smoothing(&self) -> MacdSmoothing {
        self.smoothing
    }

    #[inline]
    #[must_use]
    pub fn seed(&self) -> Seed {
        self.seed
    }

    fn line_required(&self, interval: NonZero<usize>) -> usize {
        match self.smoothing {
            MacdSmoothing::Ema => EmaConfig::new(interval).required_inputs(),
            MacdSmoothing::Dema => DemaConfig::new(interval).required_inputs(),
        }
    }
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        match self.seed {
            Seed::First => self.long.get(),
            Seed::Sma => self.line_required(self.long) + self.line_required(self.signal) - 1,
        }
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {}, {})",
            self.short, self.long, self.signal, self.smoothing, self.seed
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: 12 / 26 / 9, [`MacdSmoothing::Ema`], [`Seed::First`].
/// The short interval must be less than the long one.
pub struct MacdConfigBuilder {
    short: Option<NonZero<usize>>,
    long: Option<NonZero<usize>>,
    signal: Option<NonZero<usize>>,
    smoothing: MacdSmoothing,
    seed: Seed,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        let defaults = MacdConfig::default_12_26_9();
        Self {
            short: Some(defaults.short),
            long: Some(defaults.long),
            signal: Some(defaults.signal),
            smoothing: defaults.smoothing,
            seed: defaults.seed,
        }
    }

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
    pub fn signal(mut self, interval: NonZero<usize>) -> Self {
        self.signal.replace(interval);
        self
    }

    #[must_use]
    pub fn smoothing(mut self, smoothing: MacdSmoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    fn build(self) -> Result<MacdConfig, ConfigError> {
        let short = require(self.short, "short")?;
        let long = require(self.long, "long")?;

        if short >= long {
            return Err(ConfigError::IntervalOrder {
                short: short.get(),
                long: long.get(),
            });
        }

        Ok(MacdConfig {
            short,
            long,
            signal: require(self.signal, "signal")?,
            smoothing: self.smoothing,
            seed: self.seed,
        })
    }
}

/// MACD output.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacdValue<N: Num = f64> {
    macd: N,
    signal: N,
    histogram: N,
}

impl<N: Num> MacdValue<N> {
    /// Short line minus long line.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> N {
        self.macd
    }

    /// Smoothed MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> N {
        self.signal
    }

    /// `macd − signal`.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> N {
        self.histogram
    }
}

impl<N: Num> Display for MacdValue<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD(m: {}, s: {}, h: {})",
            self.macd, self.signal, self.histogram
        )
    }
}

#[derive(Clone, Debug)]
enum Line<N: Num> {
    Ema(Ema<N>),
    Dema(Dema<N>),
}

impl<N: Num> Line<N> {
    fn new(smoothing: MacdSmoothing, interval: NonZero<usize>, seed: Seed) -> Self {
        match (smoothing, seed) {
            (MacdSmoothing::Ema, Seed::Sma) => Self::Ema(Ema::new(EmaConfig::new(interval))),
            (MacdSmoothing::Ema, Seed::First) => {
                Self::Ema(Ema::new(EmaConfig::first_seeded(interval)))
            }
            (MacdSmoothing::Dema, Seed::Sma) => Self::Dema(Dema::new(DemaConfig::new(interval))),
            (MacdSmoothing::Dema, Seed::First) => {
                Self::Dema(Dema::new(DemaConfig::first_seeded(interval)))
            }
        }
    }

    fn update(&mut self, price: N, replace: bool) {
        match self {
            Self::Ema(ema) => {
                ema.update(price, replace);
            }
            Self::Dema(dema) => {
                dema.update(price, replace);
            }
        }
    }

    fn is_stable(&self) -> bool {
        match self {
            Self::Ema(ema) => ema.is_stable(),
            Self::Dema(dema) => dema.is_stable(),
        }
    }

    fn estimate(&self) -> Option<N> {
        match self {
            Self::Ema(ema) => ema.estimate(),
            Self::Dema(dema) => dema.estimate(),
        }
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// macd      = line(short) − line(long)
/// signal    = line(signal) over macd
/// histogram = macd − signal
/// ```
///
/// where `line` is an EMA or a DEMA. Signals the trend from the histogram
/// sign.
///
/// # Example
///
/// ```
/// use streamta::{IndicatorConfig, IndicatorConfigBuilder, Macd, MacdConfig};
/// use std::num::NonZero;
///
/// let config = MacdConfig::builder()
///     .short(NonZero::new(2).unwrap())
///     .long(NonZero::new(5).unwrap())
///     .signal(NonZero::new(9).unwrap())
///     .build()
///     .unwrap();
/// let mut macd: Macd = Macd::new(config);
///
/// let results = macd.updates([81.59, 81.06, 82.87, 83.0, 83.61], false);
/// let first = results[4].unwrap();
/// assert_eq!(first.histogram(), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Macd<N: Num = f64> {
    config: MacdConfig,
    short: Line<N>,
    long: Line<N>,
    signal: Line<N>,
    current: Option<MacdValue<N>>,
    trend: SignalState<TrendSignal>,
}

impl<N: Num> Indicator for Macd<N> {
    type Config = MacdConfig;
    type Input = N;
    type Output = MacdValue<N>;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            short: Line::new(config.smoothing, config.short, config.seed),
            long: Line::new(config.smoothing, config.long, config.seed),
            signal: Line::new(config.smoothing, config.signal, config.seed),
            current: None,
            trend: SignalState::default(),
        }
    }

    fn config(&self) -> &MacdConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<Self::Output> {
        self.short.update(price, replace);
        self.long.update(price, replace);

        let macd = if self.long.is_stable() {
            self.short
                .estimate()
                .zip(self.long.estimate())
                .map(|(short, long)| short - long)
        } else {
            None
        };

        if let Some(macd) = macd {
            self.signal.update(macd, replace);
        }

        self.current = macd.zip(self.signal.estimate()).map(|(macd, signal)| MacdValue {
            macd,
            signal,
            histogram: macd - signal,
        });

        let trend = self
            .current
            .map_or(TrendSignal::Unknown, |v| TrendSignal::from_sign(v.histogram));
        self.trend.record(trend, replace);

        self.current
    }

    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl<N: Num> Signaling for Macd<N> {
    type State = TrendSignal;

    fn signal(&self) -> Signal<TrendSignal> {
        self.trend.signal()
    }
}

impl<N: Num> Display for Macd<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {})",
            self.config.short, self.config.long, self.config.signal
        )
    }
}
