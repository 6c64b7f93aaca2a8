use std::fmt::Display;

use crate::{Candle, Indicator, Num, Register};

unit_config!(
    /// Configuration for the True Range ([`Tr`]) indicator.
    TrConfig,
    TrConfigBuilder,
    2
);

/// True Range (TR).
///
/// The candle's range extended to the previous close when that close lies
/// outside it:
///
/// ```text
/// TR = max(high − low, |high − prev_close|, |low − prev_close|)
/// ```
///
/// The first candle has no previous close, so the indicator yields a value
/// from the second candle on. [`Atr`](crate::Atr) still seeds its smoothing
/// with the plain range of the first bar.
///
/// ```
/// use streamta::{Candle, Tr, TrConfig};
///
/// let mut tr: Tr = Tr::new(TrConfig);
/// assert_eq!(tr.add(Candle::hlc(12.0, 10.0, 11.0)), None);
/// assert!(!tr.is_stable());
///
/// // gap up: range 1, but 4 above the previous close
/// assert_eq!(tr.add(Candle::hlc(15.0, 14.0, 14.5)), Some(4.0));
/// assert!(tr.is_stable());
/// ```
#[derive(Clone, Debug)]
pub struct Tr<N: Num = f64> {
    config: TrConfig,
    closes: Register<N>,
    range: Option<N>,
    current: Option<N>,
}

impl<N: Num> Tr<N> {
    /// Range of the latest candle, available from the first candle on.
    pub(crate) fn range(&self) -> Option<N> {
        self.range
    }
}

impl<N: Num> Indicator for Tr<N> {
    type Config = TrConfig;
    type Input = Candle<N>;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            closes: Register::default(),
            range: None,
            current: None,
        }
    }

    fn config(&self) -> &TrConfig {
        &self.config
    }

    fn update(&mut self, candle: Candle<N>, replace: bool) -> Option<N> {
        let replace = replace && self.closes.get().is_some();
        let range = candle.high - candle.low;

        self.current = self.closes.base(replace).map(|close| {
            range
                .max((candle.high - close).abs())
                .max((candle.low - close).abs())
        });
        self.range = Some(self.current.unwrap_or(range));

        self.closes.set(candle.close, replace);
        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Display for Tr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TR")
    }
}
