use std::fmt::Display;

use crate::{InputError, Num};

/// OHLCV bar data.
///
/// Implement this on your own kline type and convert with
/// [`Candle::from_ohlcv`] before feeding candle indicators.
///
/// # Example
///
/// ```
/// use streamta::{Candle, Ohlcv};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64, v: f64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> f64 { self.o }
///     fn high(&self) -> f64 { self.h }
///     fn low(&self) -> f64 { self.l }
///     fn close(&self) -> f64 { self.c }
///     fn volume(&self) -> f64 { self.v }
/// }
///
/// let kline = MyKline { o: 1.0, h: 3.0, l: 0.5, c: 2.0, v: 10.0 };
/// let candle = Candle::from_ohlcv(&kline);
/// assert_eq!(candle.high, 3.0);
/// ```
pub trait Ohlcv<N: Num = f64> {
    /// Opening price of the bar.
    fn open(&self) -> N;

    /// Highest price during the bar.
    fn high(&self) -> N;

    /// Lowest price during the bar.
    fn low(&self) -> N;

    /// Closing (or latest) price of the bar.
    fn close(&self) -> N;

    /// Trade volume during the bar. Defaults to zero.
    ///
    /// Indicators that don't use volume ignore this value.
    fn volume(&self) -> N {
        N::ZERO
    }
}

/// A single observation for candle-based indicators.
///
/// All fields use the same numeric track. Candles are plain values: a
/// replace supersedes the last candle, it never mutates a stored one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candle<N: Num = f64> {
    pub open: N,
    pub high: N,
    pub low: N,
    pub close: N,
    pub volume: N,
}

impl<N: Num> Candle<N> {
    #[must_use]
    pub fn new(open: N, high: N, low: N, close: N, volume: N) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Candle with only high, low and close; open is set to close and
    /// volume to zero.
    #[must_use]
    pub fn hlc(high: N, low: N, close: N) -> Self {
        Self::new(close, high, low, close, N::ZERO)
    }

    /// Copies any [`Ohlcv`] bar.
    #[must_use]
    pub fn from_ohlcv(bar: &impl Ohlcv<N>) -> Self {
        Self::new(bar.open(), bar.high(), bar.low(), bar.close(), bar.volume())
    }

    /// Parses a candle from decimal strings, as delivered by exchange feeds.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidNumber`] naming the first field that does
    /// not parse.
    ///
    /// ```
    /// use streamta::Candle;
    /// use rust_decimal::Decimal;
    /// use rust_decimal_macros::dec;
    ///
    /// let candle: Candle<Decimal> = Candle::parse("1.1", "1.5", "0.9", "1.2", "300").unwrap();
    /// assert_eq!(candle.close, dec!(1.2));
    ///
    /// assert!(Candle::<f64>::parse("1", "x", "1", "1", "1").is_err());
    /// ```
    pub fn parse(
        open: &str,
        high: &str,
        low: &str,
        close: &str,
        volume: &str,
    ) -> Result<Self, InputError> {
        Ok(Self::new(
            parse_field("open", open)?,
            parse_field("high", high)?,
            parse_field("low", low)?,
            parse_field("close", close)?,
            parse_field("volume", volume)?,
        ))
    }
}

impl<N: Num> Ohlcv<N> for Candle<N> {
    #[inline]
    fn open(&self) -> N {
        self.open
    }

    #[inline]
    fn high(&self) -> N {
        self.high
    }

    #[inline]
    fn low(&self) -> N {
        self.low
    }

    #[inline]
    fn close(&self) -> N {
        self.close
    }

    #[inline]
    fn volume(&self) -> N {
        self.volume
    }
}

impl<N: Num> Display for Candle<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candle(o: {}, h: {}, l: {}, c: {}, v: {})",
            self.open, self.high, self.low, self.close, self.volume
        )
    }
}

fn parse_field<N: Num>(field: &'static str, value: &str) -> Result<N, InputError> {
    value
        .trim()
        .parse::<N>()
        .map_err(|e| InputError::InvalidNumber {
            field,
            value: value.to_owned(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_exact_track() {
        let candle: Candle<Decimal> = Candle::parse("10", "12.5", "9.75", "11", "0").unwrap();
        assert_eq!(candle.high, dec!(12.5));
        assert_eq!(candle.low, dec!(9.75));
        assert_eq!(candle.volume, Decimal::ZERO);
    }

    #[test]
    fn parse_reports_failing_field() {
        let err = Candle::<f64>::parse("1", "2", "1", "abc", "1").unwrap_err();
        let InputError::InvalidNumber { field, value, .. } = err;
        assert_eq!(field, "close");
        assert_eq!(value, "abc");
    }

    #[test]
    fn hlc_defaults_open_and_volume() {
        let candle = Candle::hlc(3.0, 1.0, 2.0);
        assert_eq!(candle.open, 2.0);
        assert_eq!(candle.volume, 0.0);
    }

    #[test]
    fn display() {
        let candle = Candle::new(1.0, 2.0, 0.5, 1.5, 10.0);
        assert_eq!(candle.to_string(), "Candle(o: 1, h: 2, l: 0.5, c: 1.5, v: 10)");
    }
}
