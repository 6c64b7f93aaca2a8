//! Streaming technical analysis indicators for Rust.
//!
//! Indicators consume one observation at a time, a scalar price or a
//! [`Candle`], and return typed results. Values are `None` until enough data
//! has been received for the indicator to be stable. The latest observation
//! can be corrected with `replace`, which makes the indicators safe to feed
//! from a live, still-forming bar.
//!
//! Every indicator is generic over its numeric track: `Sma` computes with
//! `f64`, `Sma<Decimal>` with exact [`rust_decimal::Decimal`] arithmetic. Both
//! tracks share one implementation and the same edge-case policy.
//!
//! Each indicator type exposes [`new`](Sma::new), [`add`](Sma::add),
//! [`replace`](Sma::replace) and [`value`](Sma::value) as inherent methods,
//! no trait import needed. Import [`Indicator`] only for generic code.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use streamta::{Rsi, RsiConfig, Signaling};
//! use std::num::NonZero;
//!
//! let mut rsi: Rsi<rust_decimal::Decimal> = Rsi::new(RsiConfig::new(NonZero::new(2).unwrap()));
//! rsi.add(dec!(10));
//! rsi.add(dec!(11));
//! assert_eq!(rsi.add(dec!(12)), Some(dec!(100)));
//! assert!(rsi.signal().has_changed);
//! ```

/// Config with a single window length and a matching builder.
macro_rules! interval_config {
    ($(#[$meta:meta])* $config:ident, $builder:ident) => {
        $(#[$meta])*
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $config {
            interval: std::num::NonZero<usize>,
        }

        impl $config {
            #[must_use]
            pub fn new(interval: std::num::NonZero<usize>) -> Self {
                Self { interval }
            }

            /// Window length.
            #[inline]
            #[must_use]
            pub fn interval(&self) -> usize {
                self.interval.get()
            }
        }

        impl std::fmt::Display for $config {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($config), self.interval)
            }
        }

        #[doc = concat!("Builder for [`", stringify!($config), "`]. The interval must be set.")]
        pub struct $builder {
            interval: Option<std::num::NonZero<usize>>,
        }

        impl $builder {
            fn new() -> Self {
                Self { interval: None }
            }

            /// Sets the window length.
            #[inline]
            #[must_use]
            pub fn interval(mut self, interval: std::num::NonZero<usize>) -> Self {
                self.interval.replace(interval);
                self
            }
        }

        impl $crate::IndicatorConfigBuilder<$config> for $builder {
            fn build(self) -> Result<$config, $crate::ConfigError> {
                Ok($config::new($crate::indicator::require(
                    self.interval,
                    "interval",
                )?))
            }
        }
    };
}

/// Config without parameters.
macro_rules! unit_config {
    ($(#[$meta:meta])* $config:ident, $builder:ident, $required:expr) => {
        $(#[$meta])*
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $config;

        impl std::fmt::Display for $config {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(stringify!($config))
            }
        }

        #[doc = concat!("Builder for [`", stringify!($config), "`].")]
        pub struct $builder;

        impl $crate::IndicatorConfigBuilder<$config> for $builder {
            fn build(self) -> Result<$config, $crate::ConfigError> {
                Ok($config)
            }
        }

        impl $crate::IndicatorConfig for $config {
            type Builder = $builder;

            fn builder() -> Self::Builder {
                $builder
            }

            fn required_inputs(&self) -> usize {
                $required
            }
        }
    };
}

/// Config with a window length and a pluggable smoothing, Wilder's by
/// default.
macro_rules! smoothed_config {
    ($(#[$meta:meta])* $config:ident, $builder:ident) => {
        $(#[$meta])*
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $config {
            interval: std::num::NonZero<usize>,
            smoothing: $crate::Smoothing,
        }

        impl $config {
            /// Wilder-smoothed over `interval` observations.
            #[must_use]
            pub fn new(interval: std::num::NonZero<usize>) -> Self {
                Self {
                    interval,
                    smoothing: $crate::Smoothing::Wsma,
                }
            }

            /// Same interval with a different smoothing.
            #[must_use]
            pub fn with_smoothing(self, smoothing: $crate::Smoothing) -> Self {
                Self { smoothing, ..self }
            }

            #[inline]
            #[must_use]
            pub fn interval(&self) -> usize {
                self.interval.get()
            }

            #[inline]
            #[must_use]
            pub fn smoothing(&self) -> $crate::Smoothing {
                self.smoothing
            }
        }

        impl std::fmt::Display for $config {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(
                    f,
                    "{}({}, {})",
                    stringify!($config),
                    self.interval,
                    self.smoothing
                )
            }
        }

        #[doc = concat!("Builder for [`", stringify!($config), "`]. The interval must be set; smoothing defaults to WSMA.")]
        pub struct $builder {
            interval: Option<std::num::NonZero<usize>>,
            smoothing: $crate::Smoothing,
        }

        impl $builder {
            fn new() -> Self {
                Self {
                    interval: None,
                    smoothing: $crate::Smoothing::Wsma,
                }
            }

            #[inline]
            #[must_use]
            pub fn interval(mut self, interval: std::num::NonZero<usize>) -> Self {
                self.interval.replace(interval);
                self
            }

            #[inline]
            #[must_use]
            pub fn smoothing(mut self, smoothing: $crate::Smoothing) -> Self {
                self.smoothing = smoothing;
                self
            }
        }

        impl $crate::IndicatorConfigBuilder<$config> for $builder {
            fn build(self) -> Result<$config, $crate::ConfigError> {
                Ok($config {
                    interval: $crate::indicator::require(self.interval, "interval")?,
                    smoothing: self.smoothing,
                })
            }
        }
    };
}

mod error;
mod indicator;
mod num;
mod ohlcv;
mod price_source;
mod price_window;
mod register;
mod signal;
pub mod stats;
mod window;

mod abands;
mod ac;
mod adx;
mod ao;
mod atr;
mod bb;
mod bbw;
mod cci;
mod cg;
mod dema;
mod dma;
mod dx;
mod ema;
mod iqr;
mod linreg;
mod macd;
mod mad;
mod mom;
mod moving_average;
mod obv;
mod period;
mod psar;
mod rei;
mod roc;
mod rsi;
mod sma;
mod spencer;
mod stoch;
mod stoch_rsi;
mod tds;
mod tr;
mod tracked;
mod vwap;
mod williams_r;
mod wma;
mod wsma;
mod zigzag;

pub use crate::error::{ConfigError, InputError, NotEnoughDataError};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::num::Num;
pub use crate::ohlcv::{Candle, Ohlcv};
pub use crate::price_source::PriceSource;
pub use crate::register::Register;
pub use crate::signal::{MomentumSignal, Signal, Signaling, TrendSignal};
pub use crate::window::Window;

pub use crate::abands::{
    AccelerationBands, AccelerationBandsConfig, AccelerationBandsConfigBuilder,
    AccelerationBandsValue,
};
pub use crate::ac::{Ac, AcConfig, AcConfigBuilder};
pub use crate::adx::{Adx, AdxConfig, AdxConfigBuilder};
pub use crate::ao::{Ao, AoConfig, AoConfigBuilder};
pub use crate::atr::{Atr, AtrConfig, AtrConfigBuilder};
pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, BbValue};
pub use crate::bbw::Bbw;
pub use crate::cci::{Cci, CciConfig, CciConfigBuilder};
pub use crate::cg::{Cg, CgConfig, CgConfigBuilder, CgValue};
pub use crate::dema::{Dema, DemaConfig, DemaConfigBuilder};
pub use crate::dma::{Dma, DmaConfig, DmaConfigBuilder, DmaValue};
pub use crate::dx::{Dx, DxConfig, DxConfigBuilder, DxValue};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder, Seed};
pub use crate::iqr::{Iqr, IqrConfig, IqrConfigBuilder};
pub use crate::linreg::{LinReg, LinRegConfig, LinRegConfigBuilder, LinRegValue};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdSmoothing, MacdValue};
pub use crate::mad::{Mad, MadConfig, MadConfigBuilder};
pub use crate::mom::{Mom, MomConfig, MomConfigBuilder};
pub use crate::moving_average::{
    MovingAverage, MovingAverageConfig, MovingAverageConfigBuilder, Smoothing,
};
pub use crate::obv::{Obv, ObvConfig, ObvConfigBuilder};
pub use crate::period::{Period, PeriodConfig, PeriodConfigBuilder, PeriodValue};
pub use crate::psar::{Psar, PsarConfig, PsarConfigBuilder};
pub use crate::rei::{Rei, ReiConfig, ReiConfigBuilder};
pub use crate::roc::{Roc, RocConfig, RocConfigBuilder};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder};
pub use crate::spencer::{Spencer, SpencerConfig, SpencerConfigBuilder};
pub use crate::stoch::{Stoch, StochConfig, StochConfigBuilder, StochValue};
pub use crate::stoch_rsi::{StochRsi, StochRsiConfig, StochRsiConfigBuilder};
pub use crate::tds::{Tds, TdsConfig, TdsConfigBuilder};
pub use crate::tr::{Tr, TrConfig, TrConfigBuilder};
pub use crate::tracked::Tracked;
pub use crate::vwap::{Vwap, VwapConfig, VwapConfigBuilder};
pub use crate::williams_r::{WilliamsR, WilliamsRConfig, WilliamsRConfigBuilder};
pub use crate::wma::{Wma, WmaConfig, WmaConfigBuilder};
pub use crate::wsma::{Rma, RmaConfig, RmaConfigBuilder, Wsma, WsmaConfig, WsmaConfigBuilder};
pub use crate::zigzag::{ZigZag, ZigZagConfig, ZigZagConfigBuilder};

macro_rules! impl_indicator_methods {
    ($($type:ident),+ $(,)?) => {$(
        impl<N: Num> $type<N> {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: <Self as Indicator>::Config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::add`].
            #[inline]
            pub fn add(
                &mut self,
                input: <Self as Indicator>::Input,
            ) -> Option<<Self as Indicator>::Output> {
                <Self as Indicator>::add(self, input)
            }

            /// See [`Indicator::replace`].
            #[inline]
            pub fn replace(
                &mut self,
                input: <Self as Indicator>::Input,
            ) -> Option<<Self as Indicator>::Output> {
                <Self as Indicator>::replace(self, input)
            }

            /// See [`Indicator::update`].
            #[inline]
            pub fn update(
                &mut self,
                input: <Self as Indicator>::Input,
                replace: bool,
            ) -> Option<<Self as Indicator>::Output> {
                <Self as Indicator>::update(self, input, replace)
            }

            /// See [`Indicator::updates`].
            pub fn updates<I>(
                &mut self,
                inputs: I,
                replace: bool,
            ) -> Vec<Option<<Self as Indicator>::Output>>
            where
                I: IntoIterator<Item = <Self as Indicator>::Input>,
            {
                <Self as Indicator>::updates(self, inputs, replace)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<<Self as Indicator>::Output> {
                <Self as Indicator>::value(self)
            }

            /// See [`Indicator::value_or_err`].
            ///
            /// # Errors
            ///
            /// Returns [`NotEnoughDataError`] while not stable.
            #[inline]
            pub fn value_or_err(&self) -> Result<<Self as Indicator>::Output, NotEnoughDataError> {
                <Self as Indicator>::value_or_err(self)
            }

            /// See [`Indicator::is_stable`].
            #[must_use]
            #[inline]
            pub fn is_stable(&self) -> bool {
                <Self as Indicator>::is_stable(self)
            }

            /// See [`Indicator::required_inputs`].
            #[must_use]
            #[inline]
            pub fn required_inputs(&self) -> usize {
                <Self as Indicator>::required_inputs(self)
            }
        }
    )+};
}

impl_indicator_methods!(
    AccelerationBands,
    Ac,
    Adx,
    Ao,
    Atr,
    Bb,
    Bbw,
    Cci,
    Cg,
    Dema,
    Dma,
    Dx,
    Ema,
    Iqr,
    LinReg,
    Macd,
    Mad,
    Mom,
    MovingAverage,
    Obv,
    Period,
    Psar,
    Rei,
    Roc,
    Rsi,
    Sma,
    Spencer,
    Stoch,
    StochRsi,
    Tds,
    Tr,
    Vwap,
    WilliamsR,
    Wma,
    Wsma,
    Rma,
    ZigZag,
);

#[cfg(test)]
mod test_util;
