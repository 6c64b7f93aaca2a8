use std::fmt::Display;

use tracing::trace;

use crate::{Candle, Indicator, Num, PriceSource, register::Undo};

unit_config!(
    /// Configuration for the Volume-Weighted Average Price ([`Vwap`]).
    VwapConfig,
    VwapConfigBuilder,
    1
);

#[derive(Clone, Copy, Debug)]
struct Totals<N> {
    price_volume: N,
    volume: N,
}

/// Volume-Weighted Average Price (VWAP).
///
/// Cumulative typical price × volume over cumulative volume since the
/// indicator was created or last [`reset`](Vwap::reset).
///
/// Candles without volume carry no weight and are ignored entirely: neither
/// the totals nor the result change, and a later replace still corrects the
/// last candle that had volume.
///
/// ```
/// use streamta::{Candle, Vwap, VwapConfig};
///
/// let mut vwap: Vwap = Vwap::new(VwapConfig);
/// vwap.add(Candle::new(9.0, 9.0, 9.0, 9.0, 100.0));
/// // (9 × 100 + 12 × 300) / 400
/// assert_eq!(vwap.add(Candle::new(12.0, 12.0, 12.0, 12.0, 300.0)), Some(11.25));
/// ```
#[derive(Clone, Debug)]
pub struct Vwap<N: Num = f64> {
    config: VwapConfig,
    totals: Undo<Totals<N>>,
    current: Option<N>,
}

impl<N: Num> Vwap<N> {
    /// Starts a new accumulation period, e.g. at a session boundary.
    pub fn reset(&mut self) {
        self.totals = Undo::new(Totals {
            price_volume: N::ZERO,
            volume: N::ZERO,
        });
        self.current = None;
    }
}

impl<N: Num> Indicator for Vwap<N> {
    type Config = VwapConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            totals: Undo::new(Totals {
                price_volume: N::ZERO,
                volume: N::ZERO,
            }),
            current: None,
        }
    }

    fn config(&self) -> &VwapConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        if candle.volume.is_zero() {
            trace!(close = %candle.close, "vwap: ignoring candle without volume");
            return self.current;
        }

        let replace = replace && self.current.is_some();
        let typical = PriceSource::HLC3.extract(&candle);

        let totals = self.totals.stage(replace);
        totals.price_volume += typical * candle.volume;
        totals.volume += candle.volume;

        self.current = totals.price_volume.checked_div(totals.volume);
        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Display for Vwap<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VWAP")
    }
}
