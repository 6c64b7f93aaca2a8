use std::fmt::Display;

use crate::{Indicator, IndicatorConfig, Num, price_window::PriceWindow};

interval_config!(
    /// Configuration for the Mean Absolute Deviation ([`Mad`]) indicator.
    MadConfig,
    MadConfigBuilder
);

impl IndicatorConfig for MadConfig {
    type Builder = MadConfigBuilder;

    fn builder() -> Self::Builder {
        MadConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval()
    }
}

/// Mean Absolute Deviation (MAD).
///
/// Average distance of the window's values from their mean. Outliers raise
/// it less than they raise the standard deviation.
///
/// ```
/// use streamta::{Mad, MadConfig};
/// use std::num::NonZero;
///
/// let mut mad: Mad = Mad::new(MadConfig::new(NonZero::new(5).unwrap()));
/// let results = mad.updates([2.0, 2.0, 3.0, 4.0, 14.0], false);
/// assert_eq!(results[4], Some(3.6));
/// ```
#[derive(Clone, Debug)]
pub struct Mad<N: Num = f64> {
    config: MadConfig,
    window: PriceWindow<N>,
    current: Option<N>,
}

impl<N: Num> Mad<N> {
    /// Mean of the full window the deviation is measured from.
    pub(crate) fn mean(&self) -> Option<N> {
        self.window.mean()
    }
}

impl<N: Num> Indicator for Mad<N> {
    type Config = MadConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: PriceWindow::new(config.interval()),
            current: None,
        }
    }

    fn config(&self) -> &MadConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        self.window.update(price, replace);

        self.current = self.window.mean().map(|mean| {
            let deviations = self.window.window().iter().map(|&v| (v - mean).abs());
            deviations.sum::<N>() / N::from_usize(self.config.interval())
        });
        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Display for Mad<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MAD({})", self.config.interval)
    }
}
