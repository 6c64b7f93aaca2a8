use std::fmt::Display;

use crate::{Indicator, IndicatorConfig, Num, Window};

interval_config!(
    /// Configuration for [`Period`].
    PeriodConfig,
    PeriodConfigBuilder
);

impl IndicatorConfig for PeriodConfig {
    type Builder = PeriodConfigBuilder;

    fn builder() -> Self::Builder {
        PeriodConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval()
    }
}

/// Lowest and highest value of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodValue<N: Num = f64> {
    lowest: N,
    highest: N,
}

impl<N: Num> PeriodValue<N> {
    #[inline]
    #[must_use]
    pub fn lowest(&self) -> N {
        self.lowest
    }

    #[inline]
    #[must_use]
    pub fn highest(&self) -> N {
        self.highest
    }

    /// `highest − lowest`.
    #[inline]
    #[must_use]
    pub fn range(&self) -> N {
        self.highest - self.lowest
    }
}

/// Rolling minimum and maximum over the last `interval` values.
///
/// ```
/// use streamta::{Period, PeriodConfig};
/// use std::num::NonZero;
///
/// let mut period: Period = Period::new(PeriodConfig::new(NonZero::new(2).unwrap()));
/// period.add(72.0);
/// let value = period.add(1337.0).unwrap();
/// assert_eq!(value.lowest(), 72.0);
/// assert_eq!(value.highest(), 1337.0);
/// ```
#[derive(Clone, Debug)]
pub struct Period<N: Num = f64> {
    config: PeriodConfig,
    window: Window<N>,
    current: Option<PeriodValue<N>>,
}

impl<N: Num> Indicator for Period<N> {
    type Config = PeriodConfig;
    type Input = N;
    type Output = PeriodValue<N>;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: Window::new(config.interval()),
            current: None,
        }
    }

    fn config(&self) -> &PeriodConfig {
        &self.config
    }

    fn update(&mut self, value: N, replace: bool) -> Option<PeriodValue<N>> {
        self.window.push_update(replace, value);

        self.current = self.window.is_full().then(|| {
            self.window.iter().fold(
                PeriodValue {
                    lowest: value,
                    highest: value,
                },
                |acc, &v| PeriodValue {
                    lowest: acc.lowest.min(v),
                    highest: acc.highest.max(v),
                },
            )
        });
        self.current
    }

    fn value(&self) -> Option<PeriodValue<N>> {
        self.current
    }
}

impl<N: Num> Display for Period<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PERIOD({})", self.config.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{PRICES, nz};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn period(interval: usize) -> Period {
        Period::new(PeriodConfig::new(nz(interval)))
    }

    #[test]
    fn tulip_min() {
        let expected = [
            81.06, 81.06, 82.84, 82.84, 82.84, 82.84, 82.84, 83.99, 84.36, 84.36, 85.53,
        ];

        let mut period = period(5);
        let results = period.updates(PRICES, false);

        assert!(results[..4].iter().all(Option::is_none));
        for (actual, expected) in results[4..].iter().zip(expected) {
            assert_eq!(actual.unwrap().lowest(), expected);
        }
        assert_eq!(period.value().unwrap().highest(), 87.77);
    }

    #[test]
    fn replace_drops_corrected_extreme() {
        let mut period: Period<Decimal> = Period::new(PeriodConfig::new(nz(3)));
        period.updates([dec!(5), dec!(3), dec!(9)], false);
        let value = period.replace(dec!(4)).unwrap();
        assert_eq!(value.highest(), dec!(5));
        assert_eq!(value.range(), dec!(2));
    }

    #[test]
    fn display() {
        assert_eq!(period(5).to_string(), "PERIOD(5)");
    }
}
