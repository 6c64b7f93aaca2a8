use std::fmt::Display;

use rust_decimal_macros::dec;
use tracing::trace;

use crate::{
    Candle, Indicator, IndicatorConfig, Mad, MadConfig, MomentumSignal, Num, PriceSource, Signal,
    Signaling, signal::SignalState,
};

interval_config!(
    /// Configuration for the Commodity Channel Index ([`Cci`]).
    ///
    /// ```
    /// use streamta::{CciConfig, IndicatorConfig};
    /// use std::num::NonZero;
    ///
    /// assert_eq!(CciConfig::new(NonZero::new(20).unwrap()).required_inputs(), 20);
    /// ```
    CciConfig,
    CciConfigBuilder
);

impl IndicatorConfig for CciConfig {
    type Builder = CciConfigBuilder;

    fn builder() -> Self::Builder {
        CciConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval()
    }
}

/// Commodity Channel Index (CCI).
///
/// Distance of the typical price from its moving average, in units of
/// Lambert's constant times the mean absolute deviation:
///
/// ```text
/// CCI = (tp − SMA(tp)) / (0.015 × MAD(tp))
/// ```
///
/// Above +100 reads overbought, below −100 oversold. A window of identical
/// typical prices has no deviation and yields 0.
#[derive(Clone, Debug)]
pub struct Cci<N: Num = f64> {
    config: CciConfig,
    mad: Mad<N>,
    constant: N,
    current: Option<N>,
    momentum: SignalState<MomentumSignal>,
}

impl<N: Num> Indicator for Cci<N> {
    type Config = CciConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            mad: Mad::new(MadConfig::new(config.interval)),
            constant: N::from_decimal(dec!(0.015)),
            current: None,
            momentum: SignalState::default(),
        }
    }

    fn config(&self) -> &CciConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        let typical = PriceSource::HLC3.extract(&candle);

        self.current = self
            .mad
            .update(typical, replace)
            .zip(self.mad.mean())
            .map(|(deviation, mean)| {
                (typical - mean)
                    .checked_div(self.constant * deviation)
                    .unwrap_or_else(|| {
                        trace!(%typical, "cci: no deviation in window");
                        N::ZERO
                    })
            });

        let hundred = N::HUNDRED;
        let state = self.current.map_or(MomentumSignal::Unknown, |cci| {
            MomentumSignal::from_bounds(cci, -hundred, hundred)
        });
        self.momentum.record(state, replace);

        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Signaling for Cci<N> {
    type State = MomentumSignal;

    fn signal(&self) -> Signal<MomentumSignal> {
        self.momentum.signal()
    }
}

impl<N: Num> Display for Cci<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CCI({})", self.config.interval)
    }
}
