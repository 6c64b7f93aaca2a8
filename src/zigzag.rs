use std::fmt::Display;

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    Candle, ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Num,
    indicator::{positive, require},
    register::Undo,
};

/// Configuration for [`ZigZag`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZigZagConfig {
    deviation: Decimal,
}

impl ZigZagConfig {
    /// `deviation` is in percent, e.g. `dec!(5)` for 5 %. Use the builder to
    /// reject non-positive values.
    #[must_use]
    pub fn new(deviation: Decimal) -> Self {
        Self { deviation }
    }

    #[inline]
    #[must_use]
    pub fn deviation(&self) -> Decimal {
        self.deviation
    }
}

impl IndicatorConfig for ZigZagConfig {
    type Builder = ZigZagConfigBuilder;

    fn builder() -> Self::Builder {
        ZigZagConfigBuilder { deviation: None }
    }

    fn required_inputs(&self) -> usize {
        1
    }
}

impl Display for ZigZagConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ZigZagConfig({})", self.deviation)
    }
}

/// Builder for [`ZigZagConfig`]. The deviation must be set and positive.
pub struct ZigZagConfigBuilder {
    deviation: Option<Decimal>,
}

impl ZigZagConfigBuilder {
    #[must_use]
    pub fn deviation(mut self, deviation: Decimal) -> Self {
        self.deviation.replace(deviation);
        self
    }
}

impl IndicatorConfigBuilder<ZigZagConfig> for ZigZagConfigBuilder {
    fn build(self) -> Result<ZigZagConfig, ConfigError> {
        let deviation = require(self.deviation, "deviation")?;
        Ok(ZigZagConfig::new(positive(deviation, "deviation")?))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug)]
struct Swing<N> {
    direction: Direction,
    highest: N,
    lowest: N,
}

#[derive(Clone, Copy, Debug)]
struct State<N> {
    swing: Option<Swing<N>>,
    pivot: Option<N>,
}

/// ZigZag swing extractor.
///
/// Follows the running extreme of the current swing and reverses once price
/// retraces by more than `deviation` percent. A reversal emits the extreme
/// of the swing that just ended, so [`update`](Indicator::update) returns
/// `Some` only on the bars that confirm a pivot; [`value`](Indicator::value)
/// keeps the latest confirmed pivot.
///
/// The search starts in a downswing, so the first candle with any range
/// confirms its low as the first pivot.
///
/// ```
/// use rust_decimal_macros::dec;
/// use streamta::{Candle, ZigZag, ZigZagConfig};
///
/// let mut zigzag: ZigZag = ZigZag::new(ZigZagConfig::new(dec!(15)));
/// assert_eq!(zigzag.add(Candle::hlc(-8.0, -9.0, -8.5)), Some(-9.0));
/// assert_eq!(zigzag.add(Candle::hlc(-4.0, -5.0, -4.5)), None);
/// ```
#[derive(Clone, Debug)]
pub struct ZigZag<N: Num = f64> {
    config: ZigZagConfig,
    deviation: N,
    state: Undo<State<N>>,
}

impl<N: Num> Indicator for ZigZag<N> {
    type Config = ZigZagConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            deviation: N::from_decimal(config.deviation),
            state: Undo::new(State {
                swing: None,
                pivot: None,
            }),
        }
    }

    fn config(&self) -> &ZigZagConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        let deviation = self.deviation;
        let state = self.state.stage(replace);
        let (high, low) = (candle.high, candle.low);

        let swing = state.swing.get_or_insert(Swing {
            direction: Direction::Down,
            highest: high,
            lowest: low,
        });

        let pivot = match swing.direction {
            Direction::Up => {
                let reversal = swing.lowest
                    + (swing.highest - swing.lowest) * (N::HUNDRED - deviation) / N::HUNDRED;

                if high > swing.highest {
                    swing.highest = high;
                    None
                } else if low < reversal {
                    swing.direction = Direction::Down;
                    swing.lowest = low;
                    Some(swing.highest)
                } else {
                    None
                }
            }
            Direction::Down => {
                let reversal = low + (swing.highest - low) * deviation / N::HUNDRED;

                if low < swing.lowest {
                    swing.lowest = low;
                    None
                } else if high > reversal {
                    swing.direction = Direction::Up;
                    swing.highest = high;
                    Some(swing.lowest)
                } else {
                    None
                }
            }
        };

        if let Some(pivot) = pivot {
            debug!(%pivot, direction = ?swing.direction, "zigzag: swing reversed");
            state.pivot = Some(pivot);
        }
        pivot
    }

    fn value(&self) -> Option<N> {
        self.state.get().pivot
    }
}

impl<N: Num> Display for ZigZag<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ZIGZAG({})", self.config.deviation)
    }
}
