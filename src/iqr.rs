use std::fmt::Display;

use crate::{Indicator, IndicatorConfig, Num, Window, stats};

interval_config!(
    /// Configuration for the Interquartile Range ([`Iqr`]).
    IqrConfig,
    IqrConfigBuilder
);

impl IndicatorConfig for IqrConfig {
    type Builder = IqrConfigBuilder;

    fn builder() -> Self::Builder {
        IqrConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval()
    }
}

/// Interquartile Range (IQR).
///
/// `Q3 − Q1` of the window, with quartiles taken as the medians of the lower
/// and upper halves ([`stats::quartiles_split_half`]). A dispersion measure
/// that ignores outliers.
///
/// ```
/// use streamta::{Iqr, IqrConfig};
/// use std::num::NonZero;
///
/// let mut iqr: Iqr = Iqr::new(IqrConfig::new(NonZero::new(5).unwrap()));
/// let results = iqr.updates([1.0, 2.0, 3.0, 4.0, 5.0], false);
/// assert_eq!(results[4], Some(3.0));
/// ```
#[derive(Clone, Debug)]
pub struct Iqr<N: Num = f64> {
    config: IqrConfig,
    window: Window<N>,
    scratch: Vec<N>,
    current: Option<N>,
}

impl<N: Num> Indicator for Iqr<N> {
    type Config = IqrConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: Window::new(config.interval()),
            scratch: Vec::with_capacity(config.interval()),
            current: None,
        }
    }

    fn config(&self) -> &IqrConfig {
        &self.config
    }

    fn update(&mut self, value: N, replace: bool) -> Option<N> {
        self.window.push_update(replace, value);

        self.current = if self.window.is_full() {
            self.scratch.clear();
            self.scratch.extend(self.window.iter());
            let (q1, _, q3) = stats::quartiles_split_half(&self.scratch);
            Some(q3 - q1)
        } else {
            None
        };
        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Display for Iqr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IQR({})", self.config.interval)
    }
}
