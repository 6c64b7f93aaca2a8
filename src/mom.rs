use std::fmt::Display;

use crate::{
    Indicator, IndicatorConfig, Num, Signal, Signaling, TrendSignal, Window, signal::SignalState,
};

interval_config!(
    /// Configuration for the Momentum ([`Mom`]) indicator.
    MomConfig,
    MomConfigBuilder
);

impl IndicatorConfig for MomConfig {
    type Builder = MomConfigBuilder;

    fn builder() -> Self::Builder {
        MomConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval() + 1
    }
}

/// Momentum (MOM).
///
/// Absolute change against the price `interval` observations earlier.
///
/// ```
/// use streamta::{Mom, MomConfig};
/// use std::num::NonZero;
///
/// let mut mom: Mom = Mom::new(MomConfig::new(NonZero::new(2).unwrap()));
/// mom.updates([10.0, 11.0], false);
/// assert_eq!(mom.add(12.5), Some(2.5));
/// ```
#[derive(Clone, Debug)]
pub struct Mom<N: Num = f64> {
    config: MomConfig,
    prices: Window<N>,
    current: Option<N>,
    trend: SignalState<TrendSignal>,
}

impl<N: Num> Indicator for Mom<N> {
    type Config = MomConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            prices: Window::new(config.required_inputs()),
            current: None,
            trend: SignalState::default(),
        }
    }

    fn config(&self) -> &MomConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        self.prices.push_update(replace, price);

        self.current = self
            .prices
            .front()
            .filter(|_| self.prices.is_full())
            .map(|past| price - past);

        let state = self.current.map_or(TrendSignal::Unknown, TrendSignal::from_sign);
        self.trend.record(state, replace);

        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Signaling for Mom<N> {
    type State = TrendSignal;

    fn signal(&self) -> Signal<TrendSignal> {
        self.trend.signal()
    }
}

impl<N: Num> Display for Mom<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MOM({})", self.config.interval)
    }
}
