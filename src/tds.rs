use std::fmt::Display;

use tracing::debug;

use crate::{
    Indicator, Num, Signal, Signaling, TrendSignal, Window, register::Undo, signal::SignalState,
};

unit_config!(
    /// Configuration for the TD Sequential setup counter ([`Tds`]).
    ///
    /// Four reference closes plus nine setup bars.
    TdsConfig,
    TdsConfigBuilder,
    13
);

/// Distance of the reference close.
const LOOKBACK: usize = 4;
/// Consecutive bars that complete a setup.
const SETUP_LENGTH: u8 = 9;
/// Closes kept in the trailing buffer.
const BUFFER: usize = 13;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Setup {
    #[default]
    Idle,
    Bullish(u8),
    Bearish(u8),
}

#[derive(Clone, Copy, Debug, Default)]
struct State {
    setup: Setup,
    completed: Option<i8>,
}

/// TD Sequential setup (TDS), after Tom DeMark.
///
/// Compares each close with the close four bars earlier. Nine consecutive
/// higher closes complete a bullish setup and yield `1`; nine consecutive
/// lower closes complete a bearish setup and yield `-1`. A close in the
/// opposite direction restarts the count at one, an equal close leaves it
/// as it is, and a completed setup starts over from zero.
///
/// [`update`](Indicator::update) returns a value only on the completing bar;
/// [`value`](Indicator::value) and the signal keep the latest completion.
///
/// ```
/// use streamta::{Tds, TdsConfig};
///
/// let mut tds: Tds = Tds::new(TdsConfig);
/// let closes = [10.0, 10.0, 10.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0];
/// let results = tds.updates(closes, false);
/// assert_eq!(results[12], Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct Tds<N: Num = f64> {
    config: TdsConfig,
    closes: Window<N>,
    state: Undo<State>,
    trend: SignalState<TrendSignal>,
}

impl<N: Num> Indicator for Tds<N> {
    type Config = TdsConfig;
    type Input = N;
    type Output = i8;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            closes: Window::new(BUFFER),
            state: Undo::new(State::default()),
            trend: SignalState::default(),
        }
    }

    fn config(&self) -> &TdsConfig {
        &self.config
    }

    fn update(&mut self, close: N, replace: bool) -> Option<i8> {
        self.closes.push_update(replace, close);
        let state = self.state.stage(replace);

        let mut result = None;
        if let Some(reference) = self.closes.nth_back(LOOKBACK) {
            state.setup = if close > reference {
                match state.setup {
                    Setup::Bullish(count) => Setup::Bullish(count + 1),
                    Setup::Idle | Setup::Bearish(_) => Setup::Bullish(1),
                }
            } else if close < reference {
                match state.setup {
                    Setup::Bearish(count) => Setup::Bearish(count + 1),
                    Setup::Idle | Setup::Bullish(_) => Setup::Bearish(1),
                }
            } else {
                state.setup
            };

            result = match state.setup {
                Setup::Bullish(count) if count >= SETUP_LENGTH => Some(1),
                Setup::Bearish(count) if count >= SETUP_LENGTH => Some(-1),
                _ => None,
            };

            if let Some(direction) = result {
                debug!(direction, %close, "tds: setup completed");
                state.setup = Setup::Idle;
                state.completed = Some(direction);
            }
        }

        let signal = match state.completed {
            Some(1) => TrendSignal::Bullish,
            Some(_) => TrendSignal::Bearish,
            None => TrendSignal::Unknown,
        };
        self.trend.record(signal, replace);

        result
    }

    fn value(&self) -> Option<i8> {
        self.state.get().completed
    }
}

impl<N: Num> Signaling for Tds<N> {
    type State = TrendSignal;

    fn signal(&self) -> Signal<TrendSignal> {
        self.trend.signal()
    }
}

impl<N: Num> Display for Tds<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TDS")
    }
}
