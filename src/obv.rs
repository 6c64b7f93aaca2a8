use std::fmt::Display;

use crate::{Candle, Indicator, Num, Register, Signal, Signaling, TrendSignal, signal::SignalState};

unit_config!(
    /// Configuration for On-Balance Volume ([`Obv`]).
    ObvConfig,
    ObvConfigBuilder,
    2
);

/// On-Balance Volume (OBV).
///
/// Running volume total: a bar closing above the previous close adds its
/// volume, one closing below subtracts it, an unchanged close leaves the total
/// as it is. The first value needs two candles.
///
/// The signal follows the direction of the latest volume flow.
///
/// ```
/// use streamta::{Candle, Obv, ObvConfig};
///
/// let mut obv: Obv = Obv::new(ObvConfig);
/// assert_eq!(obv.add(Candle::new(10.0, 10.0, 10.0, 10.0, 500.0)), None);
/// assert_eq!(obv.add(Candle::new(10.0, 11.0, 10.0, 11.0, 300.0)), Some(300.0));
/// assert_eq!(obv.add(Candle::new(11.0, 11.0, 9.0, 9.0, 200.0)), Some(100.0));
/// ```
#[derive(Clone, Debug)]
pub struct Obv<N: Num = f64> {
    config: ObvConfig,
    closes: Register<N>,
    total: Register<N>,
    trend: SignalState<TrendSignal>,
}

impl<N: Num> Indicator for Obv<N> {
    type Config = ObvConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            closes: Register::default(),
            total: Register::default(),
            trend: SignalState::default(),
        }
    }

    fn config(&self) -> &ObvConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        let replace = replace && self.closes.get().is_some();
        let previous = self.closes.base(replace);
        self.closes.set(candle.close, replace);

        let Some(previous) = previous else {
            self.total.clear(replace);
            self.trend.record(TrendSignal::Unknown, replace);
            return None;
        };

        let flow = if candle.close > previous {
            candle.volume
        } else if candle.close < previous {
            -candle.volume
        } else {
            N::ZERO
        };

        let total = self.total.base(replace).unwrap_or(N::ZERO) + flow;
        self.total.set(total, replace);
        self.trend.record(TrendSignal::from_sign(flow), replace);

        Some(total)
    }

    fn value(&self) -> Option<N> {
        self.total.get()
    }
}

impl<N: Num> Signaling for Obv<N> {
    type State = TrendSignal;

    fn signal(&self) -> Signal<TrendSignal> {
        self.trend.signal()
    }
}

impl<N: Num> Display for Obv<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OBV")
    }
}
