use std::fmt::Display;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::{
    Candle, ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Num, Signal,
    Signaling, TrendSignal,
    indicator::{positive, require},
    register::Undo,
    signal::SignalState,
};

/// Configuration for the Parabolic SAR ([`Psar`]).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsarConfig {
    step: Decimal,
    max: Decimal,
}

impl PsarConfig {
    /// Acceleration grows by `step` with every new extreme and is capped at
    /// `max`. Use the builder to validate both.
    #[must_use]
    pub fn new(step: Decimal, max: Decimal) -> Self {
        Self { step, max }
    }

    /// Wilder's 0.02 step capped at 0.2.
    #[must_use]
    pub fn default_2_20() -> Self {
        Self::new(dec!(0.02), dec!(0.2))
    }

    #[inline]
    #[must_use]
    pub fn step(&self) -> Decimal {
        self.step
    }

    #[inline]
    #[must_use]
    pub fn max(&self) -> Decimal {
        self.max
    }
}

impl IndicatorConfig for PsarConfig {
    type Builder = PsarConfigBuilder;

    fn builder() -> Self::Builder {
        PsarConfigBuilder {
            step: None,
            max: None,
        }
    }

    fn required_inputs(&self) -> usize {
        2
    }
}

impl Display for PsarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PsarConfig({}, {})", self.step, self.max)
    }
}

/// Builder for [`PsarConfig`]. Both values must be set, positive, and the
/// step must stay below the maximum.
pub struct PsarConfigBuilder {
    step: Option<Decimal>,
    max: Option<Decimal>,
}

impl PsarConfigBuilder {
    #[must_use]
    pub fn step(mut self, step: Decimal) -> Self {
        self.step.replace(step);
        self
    }

    #[must_use]
    pub fn max(mut self, max: Decimal) -> Self {
        self.max.replace(max);
        self
    }
}

impl IndicatorConfigBuilder<PsarConfig> for PsarConfigBuilder {
    fn build(self) -> Result<PsarConfig, ConfigError> {
        let step = positive(require(self.step, "step")?, "step")?;
        let max = require(self.max, "max")?;

        if step >= max {
            return Err(ConfigError::AccelerationOrder { step, max });
        }
        Ok(PsarConfig::new(step, max))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Long,
    Short,
}

#[derive(Clone, Copy, Debug)]
struct Range<N> {
    high: N,
    low: N,
}

#[derive(Clone, Copy, Debug)]
struct Stop<N> {
    position: Position,
    sar: N,
    extreme: N,
    acceleration: N,
}

#[derive(Clone, Copy, Debug)]
struct State<N> {
    previous: Option<Range<N>>,
    before: Option<Range<N>>,
    stop: Option<Stop<N>>,
}

/// Parabolic SAR (stop and reverse), Tulip flavour.
///
/// The stop trails price and accelerates towards the extreme of the current
/// trend. It never enters the range of the two bars before the current one,
/// and a bar crossing it flips the position with the stop moved to the old
/// extreme.
///
/// The first two bars pick the initial position: long when the second bar's
/// midpoint is not below the first one's. The first value therefore comes
/// with the second bar.
///
/// ```
/// use streamta::{Candle, Psar, PsarConfig};
///
/// let mut psar: Psar = Psar::new(PsarConfig::default_2_20());
/// assert_eq!(psar.add(Candle::hlc(10.0, 9.0, 9.5)), None);
/// assert_eq!(psar.add(Candle::hlc(11.0, 10.0, 10.5)), Some(9.0));
/// ```
#[derive(Clone, Debug)]
pub struct Psar<N: Num = f64> {
    config: PsarConfig,
    step: N,
    max: N,
    state: Undo<State<N>>,
    trend: SignalState<TrendSignal>,
}

impl<N: Num> Indicator for Psar<N> {
    type Config = PsarConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            step: N::from_decimal(config.step),
            max: N::from_decimal(config.max),
            state: Undo::new(State {
                previous: None,
                before: None,
                stop: None,
            }),
            trend: SignalState::default(),
        }
    }

    fn config(&self) -> &PsarConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        let (step, max) = (self.step, self.max);
        let state = self.state.stage(replace);
        let (high, low) = (candle.high, candle.low);

        let Some(previous) = state.previous else {
            state.previous = Some(Range { high, low });
            self.trend.record(TrendSignal::Unknown, replace);
            return None;
        };

        let mut stop = state.stop.unwrap_or_else(|| {
            if previous.high + previous.low <= high + low {
                Stop {
                    position: Position::Long,
                    sar: previous.low,
                    extreme: previous.high,
                    acceleration: step,
                }
            } else {
                Stop {
                    position: Position::Short,
                    sar: previous.high,
                    extreme: previous.low,
                    acceleration: step,
                }
            }
        });

        stop.sar = stop.sar + (stop.extreme - stop.sar) * stop.acceleration;

        match stop.position {
            Position::Long => {
                if let Some(before) = state.before {
                    stop.sar = stop.sar.min(before.low);
                }
                stop.sar = stop.sar.min(previous.low);

                if high > stop.extreme {
                    stop.extreme = high;
                    stop.acceleration = (stop.acceleration + step).min(max);
                }
            }
            Position::Short => {
                if let Some(before) = state.before {
                    stop.sar = stop.sar.max(before.high);
                }
                stop.sar = stop.sar.max(previous.high);

                if low < stop.extreme {
                    stop.extreme = low;
                    stop.acceleration = (stop.acceleration + step).min(max);
                }
            }
        }

        let reversed = match stop.position {
            Position::Long => low < stop.sar,
            Position::Short => high > stop.sar,
        };
        if reversed {
            (stop.position, stop.extreme) = match stop.position {
                Position::Long => (Position::Short, low),
                Position::Short => (Position::Long, high),
            };
            stop.sar = stop.extreme;
            stop.acceleration = step;
            debug!(sar = %stop.sar, position = ?stop.position, "psar: stop and reverse");
        }

        state.before = state.previous;
        state.previous = Some(Range { high, low });
        state.stop = Some(stop);

        let trend = match stop.position {
            Position::Long => TrendSignal::Bullish,
            Position::Short => TrendSignal::Bearish,
        };
        self.trend.record(trend, replace);

        Some(stop.sar)
    }

    fn value(&self) -> Option<N> {
        self.state.get().stop.map(|stop| stop.sar)
    }
}

impl<N: Num> Signaling for Psar<N> {
    type State = TrendSignal;

    fn signal(&self) -> Signal<TrendSignal> {
        self.trend.signal()
    }
}

impl<N: Num> Display for Psar<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PSAR({}, {})", self.config.step, self.config.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_rounded, hlc};

    const HIGHS: [f64; 15] = [
        82.15, 81.89, 83.03, 83.30, 83.85, 83.90, 83.33, 84.30, 84.84, 85.00, 85.90, 86.58, 86.98,
        88.00, 87.87,
    ];
    const LOWS: [f64; 15] = [
        81.29, 80.64, 81.31, 82.65, 83.07, 83.11, 82.49, 82.30, 84.15, 84.11, 84.03, 85.39, 85.76,
        87.17, 87.01,
    ];

    fn series() -> Vec<Candle> {
        HIGHS
            .iter()
            .zip(LOWS)
            .map(|(&high, low)| hlc(high, low, high.midpoint(low)))
            .collect()
    }

    fn psar() -> Psar {
        Psar::new(PsarConfig::default_2_20())
    }

    #[test]
    fn matches_tulip_reference() {
        let expected = [
            82.15, 80.64, 80.64, 80.75, 80.93, 81.17, 81.39, 81.68, 82.06, 82.47, 83.02, 83.66,
            84.32, 85.06,
        ];

        let mut psar = psar();
        let results = psar.updates(series(), false);

        assert_eq!(results[0], None);
        for (actual, expected) in results[1..].iter().zip(expected) {
            assert_rounded!(actual.unwrap(), expected, 2);
        }
        assert_eq!(psar.signal().state, TrendSignal::Bullish);
    }

    #[test]
    fn stable_from_second_candle() {
        let mut psar = psar();
        assert_eq!(psar.required_inputs(), 2);

        assert_eq!(psar.replace(hlc(10.0, 9.0, 9.5)), None);
        assert_eq!(psar.value().is_some(), psar.is_stable());
        assert!(!psar.is_stable());

        psar.add(hlc(11.0, 10.0, 10.5));
        assert!(psar.is_stable());
        assert_eq!(psar.value(), Some(9.0));
    }

    #[test]
    fn stop_and_reverse() {
        let mut psar = psar();
        let results = psar.updates(
            [
                hlc(10.0, 9.0, 9.5),
                hlc(11.0, 10.0, 10.5),
                hlc(12.0, 11.0, 11.5),
                hlc(9.0, 8.0, 8.5),
                hlc(8.5, 7.5, 8.0),
            ],
            false,
        );

        // held below the lows of the two bars before
        assert_eq!(results[2], Some(9.0));
        // low of 8 crosses the stop, which jumps to the 12 extreme
        assert_eq!(results[3], Some(12.0));
        assert_eq!(results[4], Some(12.0));
        assert_eq!(psar.signal().state, TrendSignal::Bearish);

        // high of 14 flips back to long at the 7.5 extreme
        assert_eq!(psar.add(hlc(14.0, 13.0, 13.5)), Some(7.5));
        let signal = psar.signal();
        assert_eq!(signal.state, TrendSignal::Bullish);
        assert!(signal.has_changed);
    }

    #[test]
    fn acceleration_capped_at_max() {
        let config = PsarConfig::builder()
            .step(dec!(0.1))
            .max(dec!(0.2))
            .build()
            .unwrap();
        let mut psar: Psar = Psar::new(config);
        let results: Vec<f64> = psar
            .updates((0..6).map(|i| {
                let low = 9.0 + f64::from(i);
                hlc(low + 1.0, low, low + 0.5)
            }), false)
            .into_iter()
            .flatten()
            .collect();

        let expected = [9.0, 9.0, 9.6, 10.28, 11.024];
        for (actual, expected) in results.into_iter().zip(expected) {
            assert_rounded!(actual, expected, 9);
        }
    }

    mod replace {
        use super::*;

        #[test]
        fn replace_then_restore() {
            let candles = series();
            let mut psar = psar();
            psar.updates(candles[..8].iter().copied(), false);
            let closed = psar.value().unwrap();

            // crossing the stop reverses the position
            psar.replace(hlc(84.3, 70.0, 71.0));
            assert_eq!(psar.signal().state, TrendSignal::Bearish);

            assert_eq!(psar.replace(candles[7]), Some(closed));
            assert_eq!(psar.signal().state, TrendSignal::Bullish);
            assert_rounded!(psar.add(candles[8]).unwrap(), 81.68, 2);
        }

        #[test]
        fn replace_second_candle_picks_position_again() {
            let mut psar = psar();
            psar.add(hlc(10.0, 9.0, 9.5));
            assert_eq!(psar.add(hlc(11.0, 10.0, 10.5)), Some(9.0));
            // lower midpoint starts short at the first high
            assert_eq!(psar.replace(hlc(9.0, 8.0, 8.5)), Some(10.0));
            assert_eq!(psar.signal().state, TrendSignal::Bearish);
        }
    }

    #[test]
    fn exact_track() {
        let mut psar: Psar<Decimal> = Psar::new(PsarConfig::default_2_20());
        let candles = HIGHS.iter().zip(LOWS).map(|(&high, low)| {
            let high = high.to_string().parse::<Decimal>().unwrap();
            let low = low.to_string().parse::<Decimal>().unwrap();
            Candle::hlc(high, low, low)
        });

        let results = psar.updates(candles, false);
        assert_eq!(results[4], Some(dec!(80.7464)));
        assert_eq!(results[5], Some(dec!(80.932616)));
    }

    #[test]
    fn builder_validates_acceleration() {
        assert_eq!(
            PsarConfig::builder().max(dec!(0.2)).build(),
            Err(ConfigError::Missing("step"))
        );
        assert_eq!(
            PsarConfig::builder().step(dec!(0)).max(dec!(0.2)).build(),
            Err(ConfigError::NotPositive("step"))
        );
        assert_eq!(
            PsarConfig::builder().step(dec!(0.2)).max(dec!(0.2)).build(),
            Err(ConfigError::AccelerationOrder {
                step: dec!(0.2),
                max: dec!(0.2)
            })
        );
        assert_eq!(
            PsarConfig::builder().step(dec!(0.02)).max(dec!(0.2)).build(),
            Ok(PsarConfig::default_2_20())
        );
    }

    #[test]
    fn display() {
        assert_eq!(psar().to_string(), "PSAR(0.02, 0.2)");
        assert_eq!(
            PsarConfig::default_2_20().to_string(),
            "PsarConfig(0.02, 0.2)"
        );
    }
}
