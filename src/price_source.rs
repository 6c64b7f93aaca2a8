use crate::{Num, Ohlcv};

use std::fmt::{Debug, Display};

/// Price extracted from an [`Ohlcv`] bar.
///
/// Candle indicators derive their working price through a `PriceSource`
/// (e.g. CCI and VWAP use the typical price [`HLC3`](PriceSource::HLC3)).
/// Scalar indicators can be fed from candles the same way:
///
/// ```
/// use streamta::{Candle, PriceSource, Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let mut sma: Sma = Sma::new(SmaConfig::new(NonZero::new(1).unwrap()));
/// let candle = Candle::hlc(30.0, 10.0, 20.0);
///
/// assert_eq!(sma.add(PriceSource::HL2.extract(&candle)), Some(20.0));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Closing price.
    #[default]
    Close,
    /// Lowest price.
    Low,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Weighted close: `(high + low + close + close) / 4`.
    HLCC4,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    #[inline]
    pub fn extract<N: Num>(self, ohlcv: &impl Ohlcv<N>) -> N {
        let two = N::ONE + N::ONE;
        let three = two + N::ONE;
        let four = two + two;

        match self {
            Self::Open => ohlcv.open(),
            Self::High => ohlcv.high(),
            Self::Close => ohlcv.close(),
            Self::Low => ohlcv.low(),
            Self::HL2 => (ohlcv.high() + ohlcv.low()) / two,
            Self::HLC3 => (ohlcv.high() + ohlcv.low() + ohlcv.close()) / three,
            Self::OHLC4 => (ohlcv.open() + ohlcv.high() + ohlcv.low() + ohlcv.close()) / four,
            Self::HLCC4 => (ohlcv.high() + ohlcv.low() + ohlcv.close() + ohlcv.close()) / four,
        }
    }
}
