use std::fmt::Display;

use tracing::trace;

use crate::{
    Candle, Indicator, IndicatorConfig, MomentumSignal, Num, Signal, Signaling, Window,
    signal::SignalState,
};

interval_config!(
    /// Configuration for [`WilliamsR`].
    WilliamsRConfig,
    WilliamsRConfigBuilder
);

impl IndicatorConfig for WilliamsRConfig {
    type Builder = WilliamsRConfigBuilder;

    fn builder() -> Self::Builder {
        WilliamsRConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval()
    }
}

/// Williams %R.
///
/// Position of the close within the window's high-low range on an inverted
/// 0 to −100 scale:
///
/// ```text
/// %R = (highest_high − close) / (highest_high − lowest_low) × −100
/// ```
///
/// Readings at or above −20 are overbought, at or below −80 oversold. A flat
/// window has no range and returns exactly −100.
///
/// ```
/// use streamta::{Candle, WilliamsR, WilliamsRConfig};
/// use std::num::NonZero;
///
/// let mut willr: WilliamsR = WilliamsR::new(WilliamsRConfig::new(NonZero::new(2).unwrap()));
/// willr.add(Candle::hlc(10.0, 6.0, 8.0));
/// assert_eq!(willr.add(Candle::hlc(9.0, 7.0, 7.0)), Some(-75.0));
/// ```
#[derive(Clone, Debug)]
pub struct WilliamsR<N: Num = f64> {
    config: WilliamsRConfig,
    candles: Window<Candle<N>>,
    current: Option<N>,
    momentum: SignalState<MomentumSignal>,
}

impl<N: Num> Indicator for WilliamsR<N> {
    type Config = WilliamsRConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            candles: Window::new(config.interval()),
            current: None,
            momentum: SignalState::default(),
        }
    }

    fn config(&self) -> &WilliamsRConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        self.candles.push_update(replace, candle);

        self.current = self.candles.is_full().then(|| {
            let (highest, lowest) = self.candles.iter().fold(
                (candle.high, candle.low),
                |(highest, lowest), bar| (highest.max(bar.high), lowest.min(bar.low)),
            );

            ((candle.close - highest) * N::HUNDRED)
                .checked_div(highest - lowest)
                .unwrap_or_else(|| {
                    trace!(%highest, "willr: no range in window, saturating at -100");
                    -N::HUNDRED
                })
        });

        let state = self.current.map_or(MomentumSignal::Unknown, |r| {
            MomentumSignal::from_bounds(r, -N::from_usize(80), -N::from_usize(20))
        });
        self.momentum.record(state, replace);

        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Signaling for WilliamsR<N> {
    type State = MomentumSignal;

    fn signal(&self) -> Signal<MomentumSignal> {
        self.momentum.signal()
    }
}

impl<N: Num> Display for WilliamsR<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WILLR({})", self.config.interval)
    }
}
