use std::fmt::{Debug, Display};

use crate::{Indicator, Num, Register};

/// Trend classification of an indicator result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrendSignal {
    Bullish,
    Bearish,
    Sideways,
    #[default]
    Unknown,
}

/// Momentum classification of an indicator result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MomentumSignal {
    Overbought,
    Oversold,
    Neutral,
    #[default]
    Unknown,
}

impl Display for TrendSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Display for MomentumSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl TrendSignal {
    /// Positive is bullish, negative bearish, zero sideways.
    #[must_use]
    pub fn from_sign<N: Num>(value: N) -> Self {
        if value > N::ZERO {
            Self::Bullish
        } else if value < N::ZERO {
            Self::Bearish
        } else {
            Self::Sideways
        }
    }
}

impl MomentumSignal {
    /// Classifies `value` against inclusive overbought/oversold thresholds.
    #[must_use]
    pub fn from_bounds<N: Num>(value: N, oversold: N, overbought: N) -> Self {
        if value >= overbought {
            Self::Overbought
        } else if value <= oversold {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

/// A signal state plus whether it differs from the state before the latest
/// observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal<S> {
    pub state: S,
    pub has_changed: bool,
}

/// Indicators that classify their result into a categorical signal.
///
/// # Example
///
/// ```
/// use streamta::{MomentumSignal, Rsi, RsiConfig, Signaling};
/// use std::num::NonZero;
///
/// let mut rsi: Rsi = Rsi::new(RsiConfig::new(NonZero::new(2).unwrap()));
/// rsi.updates([2.0, 2.0, 2.0], false);
///
/// let signal = rsi.signal();
/// assert_eq!(signal.state, MomentumSignal::Overbought);
/// assert!(signal.has_changed);
/// ```
pub trait Signaling: Indicator {
    type State: Copy + Eq + Debug + Default;

    /// Current classification and whether the latest observation changed it.
    fn signal(&self) -> Signal<Self::State>;
}

/// Two-slot signal state, advanced with every observation so that a replace
/// compares against the state before the corrected bar.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SignalState<S> {
    register: Register<S>,
}

impl<S: Copy + Eq + Default> SignalState<S> {
    #[inline]
    pub(crate) fn record(&mut self, state: S, replace: bool) {
        self.register.set(state, replace);
    }

    #[inline]
    pub(crate) fn signal(&self) -> Signal<S> {
        let state = self.register.get().unwrap_or_default();
        let previous = self.register.previous().unwrap_or_default();

        Signal {
            state,
            has_changed: state != previous,
        }
    }
}
