use std::{fmt::Display, num::NonZero};

use crate::{
    Ao, AoConfig, Candle, ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Mom,
    MomConfig, Num, Signal, Signaling, Sma, SmaConfig, TrendSignal, indicator::require,
    signal::SignalState,
};

/// Configuration for the Accelerator Oscillator ([`Ac`]).
///
/// The signal SMA is fed the oscillator's output, so the warm-up is serial:
/// the max rule of parallel composites (34) would report stable four bars
/// before the first value exists.
///
/// ```
/// use streamta::{AcConfig, IndicatorConfig};
///
/// // 34 inputs for the first AO value, 4 more to fill SMA(5)
/// assert_eq!(AcConfig::default_5_34_5().required_inputs(), 38);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcConfig {
    ao: AoConfig,
    signal: NonZero<usize>,
}

impl AcConfig {
    #[must_use]
    pub fn default_5_34_5() -> Self {
        Self {
            ao: AoConfig::default_5_34(),
            signal: NonZero::<usize>::MIN.saturating_add(4),
        }
    }

    /// Oscillator settings.
    #[inline]
    #[must_use]
    pub fn ao(&self) -> AoConfig {
        self.ao
    }

    /// Signal SMA length.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal.get()
    }
}

impl IndicatorConfig for AcConfig {
    type Builder = AcConfigBuilder;

    fn builder() -> Self::Builder {
        AcConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.ao.required_inputs() + self.signal.get() - 1
    }
}

impl Display for AcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AcConfig({}, {}, {})",
            self.ao.short(),
            self.ao.long(),
            self.signal
        )
    }
}

/// Builder for [`AcConfig`]. Defaults: 5 / 34 / 5.
pub struct AcConfigBuilder {
    short: Option<NonZero<usize>>,
    long: Option<NonZero<usize>>,
    signal: Option<NonZero<usize>>,
}

impl AcConfigBuilder {
    fn new() -> Self {
        let defaults = AcConfig::default_5_34_5();
        Self {
            short: NonZero::new(defaults.ao.short()),
            long: NonZero::new(defaults.ao.long()),
            signal: Some(defaults.signal),
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
}

impl IndicatorConfigBuilder<AcConfig> for AcConfigBuilder {
    fn build(self) -> Result<AcConfig, ConfigError> {
        let ao = AoConfig::builder()
            .short(require(self.short, "short")?)
            .long(require(self.long, "long")?)
            .build()?;

        Ok(AcConfig {
            ao,
            signal: require(self.signal, "signal")?,
        })
    }
}

/// Accelerator Oscillator (AC).
///
/// The [`Ao`] minus its own SMA: how fast the oscillator is moving away
/// from its recent average. Above zero reads bullish, below zero bearish.
///
/// [`momentum`](Ac::momentum) reports the change of AC since the previous
/// bar.
#[derive(Clone, Debug)]
pub struct Ac<N: Num = f64> {
    config: AcConfig,
    ao: Ao<N>,
    signal: Sma<N>,
    momentum: Mom<N>,
    current: Option<N>,
    trend: SignalState<TrendSignal>,
}

impl<N: Num> Ac<N> {
    /// Change of AC against the previous bar, once two values exist.
    #[must_use]
    pub fn momentum(&self) -> Option<N> {
        self.momentum.value()
    }
}

impl<N: Num> Indicator for Ac<N> {
    type Config = AcConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            ao: Ao::new(config.ao),
            signal: Sma::new(SmaConfig::new(config.signal)),
            momentum: Mom::new(MomConfig::new(NonZero::<usize>::MIN)),
            current: None,
            trend: SignalState::default(),
        }
    }

    fn config(&self) -> &AcConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        // The signal line only sees bars where AO exists.
        let replace_signal = replace && self.ao.is_stable();
        let replace_momentum = replace && self.current.is_some();

        self.current = self.ao.update(candle, replace).and_then(|ao| {
            self.signal
                .update(ao, replace_signal)
                .map(|signal| ao - signal)
        });

        if let Some(ac) = self.current {
            self.momentum.update(ac, replace_momentum);
        }

        let state = self.current.map_or(TrendSignal::Unknown, TrendSignal::from_sign);
        self.trend.record(state, replace);

        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Signaling for Ac<N> {
    type State = TrendSignal;

    fn signal(&self) -> Signal<TrendSignal> {
        self.trend.signal()
    }
}

impl<N: Num> Display for Ac<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AC({}, {}, {})",
            self.config.ao.short(),
            self.config.ao.long(),
            self.config.signal
        )
    }
}
