use std::fmt::Display;

use crate::{
    Candle, Dx, DxConfig, Indicator, IndicatorConfig, MovingAverage, MovingAverageConfig, Num,
};

smoothed_config!(
    /// Configuration for the Average Directional Index ([`Adx`]).
    ///
    /// DX and its smoothing both run over `interval`, one after the other:
    ///
    /// ```
    /// use streamta::{AdxConfig, IndicatorConfig};
    /// use std::num::NonZero;
    ///
    /// assert_eq!(AdxConfig::new(NonZero::new(5).unwrap()).required_inputs(), 9);
    /// ```
    AdxConfig,
    AdxConfigBuilder
);

impl AdxConfig {
    fn dx(self) -> DxConfig {
        DxConfig::new(self.interval).with_smoothing(self.smoothing)
    }
}

impl IndicatorConfig for AdxConfig {
    type Builder = AdxConfigBuilder;

    fn builder() -> Self::Builder {
        AdxConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.dx().required_inputs() + self.smoothing.required_inputs(self.interval) - 1
    }
}

/// Average Directional Index (ADX).
///
/// The [`Dx`] series smoothed once more, Wilder's method by default. Reads
/// trend strength on a 0 to 100 scale regardless of direction; the
/// directional indicators are available through
/// [`plus_di`](Adx::plus_di) and [`minus_di`](Adx::minus_di).
#[derive(Clone, Debug)]
pub struct Adx<N: Num = f64> {
    config: AdxConfig,
    dx: Dx<N>,
    smoothing: MovingAverage<N>,
}

impl<N: Num> Adx<N> {
    /// `+DI` of the latest bar, once DX is stable.
    #[must_use]
    pub fn plus_di(&self) -> Option<N> {
        self.dx.value().map(|dx| dx.plus_di())
    }

    /// `−DI` of the latest bar, once DX is stable.
    #[must_use]
    pub fn minus_di(&self) -> Option<N> {
        self.dx.value().map(|dx| dx.minus_di())
    }
}

impl<N: Num> Indicator for Adx<N> {
    type Config = AdxConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            dx: Dx::new(config.dx()),
            smoothing: MovingAverage::new(MovingAverageConfig::new(
                config.smoothing,
                config.interval,
            )),
        }
    }

    fn config(&self) -> &AdxConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        let replace_smoothing = replace && self.dx.is_stable();

        let dx = self.dx.update(candle, replace)?;
        self.smoothing.update(dx.dx(), replace_smoothing)
    }

    fn value(&self) -> Option<N> {
        self.smoothing.value()
    }
}

impl<N: Num> Display for Adx<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ADX({}, {})", self.config.interval, self.config.smoothing)
    }
}
