use std::fmt::Display;

use crate::{
    Atr, AtrConfig, Candle, Indicator, IndicatorConfig, MovingAverage, MovingAverageConfig, Num,
    Register,
};

smoothed_config!(
    /// Configuration for the Directional Movement Index ([`Dx`]).
    ///
    /// ```
    /// use streamta::{DxConfig, IndicatorConfig};
    /// use std::num::NonZero;
    ///
    /// assert_eq!(DxConfig::new(NonZero::new(5).unwrap()).required_inputs(), 5);
    /// ```
    DxConfig,
    DxConfigBuilder
);

impl IndicatorConfig for DxConfig {
    type Builder = DxConfigBuilder;

    fn builder() -> Self::Builder {
        DxConfigBuilder::new()
    }

    /// The first candle feeds zero movement, so no extra warm-up.
    fn required_inputs(&self) -> usize {
        self.smoothing.required_inputs(self.interval)
    }
}

/// DX together with the directional indicators it is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DxValue<N: Num = f64> {
    dx: N,
    plus_di: N,
    minus_di: N,
}

impl<N: Num> DxValue<N> {
    /// Trend strength, 0 to 100.
    #[inline]
    #[must_use]
    pub fn dx(&self) -> N {
        self.dx
    }

    /// Smoothed upward movement as a fraction of ATR.
    #[inline]
    #[must_use]
    pub fn plus_di(&self) -> N {
        self.plus_di
    }

    /// Smoothed downward movement as a fraction of ATR.
    #[inline]
    #[must_use]
    pub fn minus_di(&self) -> N {
        self.minus_di
    }
}

/// Directional Movement Index (DX), J. Welles Wilder.
///
/// Each bar's directional movement is the part of the range expansion that
/// dominates:
///
/// ```text
/// up   = high − previous high
/// down = previous low − low
/// +DM  = up   if up > 0 and up >= down, else 0
/// −DM  = down if down > 0 and down >= up, else 0
/// ```
///
/// Both are smoothed and divided by the ATR to get `+DI` and `−DI`, then
///
/// ```text
/// DX = |+DI − −DI| / (+DI + −DI) × 100
/// ```
///
/// DX measures trend strength only; compare `+DI` with `−DI` for the
/// direction. Without directional movement DX is 0.
#[derive(Clone, Debug)]
pub struct Dx<N: Num = f64> {
    config: DxConfig,
    candles: Register<Candle<N>>,
    atr: Atr<N>,
    up: MovingAverage<N>,
    down: MovingAverage<N>,
    current: Option<DxValue<N>>,
}

impl<N: Num> Indicator for Dx<N> {
    type Config = DxConfig;
    type Input = Candle<N>;
    type Output = DxValue<N>;

    fn new(config: Self::Config) -> Self {
        let smoothing = MovingAverageConfig::new(config.smoothing, config.interval);
        Self {
            config,
            candles: Register::default(),
            atr: Atr::new(AtrConfig::new(config.interval).with_smoothing(config.smoothing)),
            up: MovingAverage::new(smoothing),
            down: MovingAverage::new(smoothing),
            current: None,
        }
    }

    fn config(&self) -> &DxConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<DxValue<N>> {
        let replace = replace && self.candles.get().is_some();
        let previous = self.candles.base(replace);
        self.candles.set(candle, replace);

        let (plus_dm, minus_dm) = previous.map_or((N::ZERO, N::ZERO), |previous| {
            let up = candle.high - previous.high;
            let down = previous.low - candle.low;

            let plus_dm = if up < N::ZERO || up < down { N::ZERO } else { up };
            let minus_dm = if down < N::ZERO || down < up { N::ZERO } else { down };
            (plus_dm, minus_dm)
        });

        let atr = self.atr.update(candle, replace);
        let up = self.up.update(plus_dm, replace);
        let down = self.down.update(minus_dm, replace);

        self.current = match (atr, up, down) {
            (Some(atr), Some(up), Some(down)) => {
                let plus_di = up.checked_div(atr).unwrap_or(N::ZERO);
                let minus_di = down.checked_div(atr).unwrap_or(N::ZERO);
                let dx = ((plus_di - minus_di).abs() * N::HUNDRED)
                    .checked_div(plus_di + minus_di)
                    .unwrap_or(N::ZERO);

                Some(DxValue {
                    dx,
                    plus_di,
                    minus_di,
                })
            }
            _ => None,
        };
        self.current
    }

    fn value(&self) -> Option<DxValue<N>> {
        self.current
    }
}

impl<N: Num> Display for Dx<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DX({}, {})", self.config.interval, self.config.smoothing)
    }
}
