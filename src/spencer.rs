use std::fmt::Display;

use crate::{Indicator, Num, Window};

const KERNEL: [i16; 15] = [-3, -6, -5, 3, 21, 46, 67, 74, 67, 46, 21, 3, -5, -6, -3];
const NORM: usize = 320;

unit_config!(
    /// Configuration for [`Spencer`]'s 15-point moving average. The kernel
    /// length is fixed, so there is nothing to configure.
    SpencerConfig,
    SpencerConfigBuilder,
    KERNEL.len()
);

/// Spencer's 15-point moving average.
///
/// Convolution of the last 15 observations with the kernel
/// `[-3, -6, -5, 3, 21, 46, 67, 74, 67, 46, 21, 3, -5, -6, -3] / 320`. The
/// kernel sums to one, so a constant series maps onto itself.
///
/// ```
/// use streamta::{Spencer, SpencerConfig};
///
/// let mut spencer: Spencer = Spencer::new(SpencerConfig);
/// let results = spencer.updates([10.0; 15], false);
/// assert_eq!(results[13], None);
/// assert!((results[14].unwrap() - 10.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Spencer<N: Num = f64> {
    config: SpencerConfig,
    weights: [N; 15],
    window: Window<N>,
    current: Option<N>,
}

impl<N: Num> Indicator for Spencer<N> {
    type Config = SpencerConfig;
    type Input = N;
    type Output = N;

    fn new(config: Self::Config) -> Self {
        let norm = N::from_usize(NORM);
        let weights = std::array::from_fn(|i| {
            let magnitude = N::from_usize(usize::from(KERNEL[i].unsigned_abs()));
            let weight = if KERNEL[i] < 0 { -magnitude } else { magnitude };
            weight / norm
        });

        Self {
            config,
            weights,
            window: Window::new(KERNEL.len()),
            current: None,
        }
    }

    fn config(&self) -> &SpencerConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<N> {
        self.window.push_update(replace, price);

        self.current = self.window.is_full().then(|| {
            self.window
                .iter()
                .zip(&self.weights)
                .map(|(&value, &weight)| value * weight)
                .sum()
        });
        self.current
    }

    fn value(&self) -> Option<N> {
        self.current
    }
}

impl<N: Num> Display for Spencer<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SMA15")
    }
}
