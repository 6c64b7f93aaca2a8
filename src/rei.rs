use std::{fmt::Display, num::NonZero};

use tracing::trace;

use crate::{
    Candle, Indicator, IndicatorConfig, MomentumSignal, Num, Signal, Signaling, Window,
    register::Undo, signal::SignalState,
};

/// Bars behind the newest one that a single term compares against.
const LOOKBACK: usize = 8;

interval_config!(
    /// Configuration for the Range Expansion Index ([`Rei`]).
    ReiConfig,
    ReiConfigBuilder
);

impl ReiConfig {
    /// DeMark's 8 bar setting.
    #[must_use]
    pub fn default_8() -> Self {
        Self::new(NonZero::<usize>::MIN.saturating_add(LOOKBACK - 1))
    }
}

impl IndicatorConfig for ReiConfig {
    type Builder = ReiConfigBuilder;

    fn builder() -> Self::Builder {
        ReiConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval() + LOOKBACK
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Sums<N> {
    bars: usize,
    directional: N,
    absolute: N,
}

/// Range Expansion Index (REI), Thomas DeMark's momentum oscillator.
///
/// Every bar contributes the two bar change of its high plus that of its
/// low. The change counts towards the directional sum unless price is
/// pinned against the closes seven and eight bars back, and always
/// counts towards the absolute sum:
///
/// ```text
/// REI = 100 × Σ directional / Σ |absolute|
/// ```
///
/// Terms accumulate from the bar after the first `interval` bars on and the
/// sums run over the whole stream, not a sliding window. The first value
/// appears once `interval + 8` bars are in. Readings
/// beyond ±60 are overbought or oversold. A series without any movement
/// reads 0.
///
/// ```
/// use streamta::{Candle, Rei, ReiConfig};
///
/// let mut rei: Rei = Rei::new(ReiConfig::default_8());
/// let flat = Candle::hlc(180.0, 180.0, 180.0);
///
/// let results = rei.updates([flat; 16], false);
/// assert_eq!(results[14], None);
/// assert_eq!(results[15], Some(0.0));
/// ```
#[derive(Clone, Debug)]
pub struct Rei<N: Num = f64> {
    config: ReiConfig,
    bars: Window<Candle<N>>,
    sums: Undo<Sums<N>>,
    current: Option<N>,
    momentum: SignalState<MomentumSignal>,
}

impl<N: Num> Rei<N> {
    /// Directional and absolute contribution of the newest bar, once the
    /// window reaches back far enough.
    fn term(&self) -> Option<(N, N)> {
        let bar = |back| self.bars.nth_back(back);
        let (now, two, five, six) = (bar(0)?, bar(2)?, bar(5)?, bar(6)?);
        let (seven, eight) = (bar(7)?, bar(8)?);

        let high_change = now.high - two.high;
        let low_change = now.low - two.low;

        let pinned_below = two.high < seven.close
            && two.high < eight.close
            && now.high < five.high
            && now.high < six.high;
        let pinned_above = two.low > seven.close
            && two.low > eight.close
            && now.low > five.low
            && now.low > six.low;

        let directional = if pinned_below || pinned_above {
            N::ZERO
        } else {
            high_change + low_change
        };
        Some((directional, high_change.abs() + low_change.abs()))
    }
}

impl<N: Num> Indicator for Rei<N> {
    type Config = ReiConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            bars: Window::new(LOOKBACK + 1),
            sums: Undo::new(Sums::default()),
            current: None,
            momentum: SignalState::default(),
        }
    }

    fn config(&self) -> &ReiConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        self.bars.push_update(replace, candle);
        let term = self.term();

        let sums = self.sums.stage(replace);
        sums.bars += 1;
        if sums.bars > self.config.interval() + 1 {
            if let Some((directional, absolute)) = term {
                sums.directional += directional;
                sums.absolute += absolute;
            }
        }

        let Sums {
            bars,
            directional,
            absolute,
        } = *sums;
        self.current = (bars >= self.config.required_inputs()).then(|| {
            directional
                .checked_div(absolute)
                .map_or_else(
                    || {
                        trace!("rei: no range movement");
                        N::ZERO
                    },
                    |ratio| ratio * N::HUNDRED,
                )
        });

        let bound = N::from_usize(60);
        let state = self.current.map_or(MomentumSignal::Unknown, |rei| {
            MomentumSignal::from_bounds(rei, -bound, bound)
        });
        self.momentum.record(state, replace);

        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Signaling for Rei<N> {
    type State = MomentumSignal;

    fn signal(&self) -> Signal<MomentumSignal> {
        self.momentum.signal()
    }
}

impl<N: Num> Display for Rei<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "REI({})", self.config.interval)
    }
}
