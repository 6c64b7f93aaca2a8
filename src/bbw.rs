use std::fmt::Display;

use tracing::trace;

use crate::{Bb, BbConfig, Indicator, Num};

/// Bollinger Bands Width (BBW).
///
/// `(upper − lower) / middle`, the band spread relative to the moving
/// average. Shares [`BbConfig`] with [`Bb`]. A zero middle band yields zero.
///
/// ```
/// use streamta::{BbConfig, Bbw};
/// use std::num::NonZero;
///
/// let mut bbw: Bbw = Bbw::new(BbConfig::new(NonZero::new(2).unwrap()));
/// bbw.add(3.0);
/// // bands 6 / 4 / 2
/// assert_eq!(bbw.add(5.0), Some(1.0));
/// ```
#[derive(Clone, Debug)]
pub struct Bbw<N: Num = f64> {
    bb: Bb<N>,
    current: Option<N>,
}

impl<N: Num> Indicator for Bbw<N> {
    type Config = BbConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            bb: Bb::new(config),
            current: None,
        }
    }

    fn config(&self) -> &BbConfig {
        self.bb.config()
    }

    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        self.current = self.bb.update(price, replace).map(|bands| {
            bands.width().checked_div(bands.middle()).unwrap_or_else(|| {
                trace!(middle = %bands.middle(), "bbw: zero middle band");
                N::ZERO
            })
        });
        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Display for Bbw<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.bb.config();
        write!(f, "BBW({}, {})", config.interval(), config.deviation())
    }
}
