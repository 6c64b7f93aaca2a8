use std::fmt::Display;

use crate::{Indicator, IndicatorConfig, Num, Window};

interval_config!(
    /// Configuration for the rolling Linear Regression ([`LinReg`]).
    LinRegConfig,
    LinRegConfigBuilder
);

impl IndicatorConfig for LinRegConfig {
    type Builder = LinRegConfigBuilder;

    fn builder() -> Self::Builder {
        LinRegConfigBuilder::new()
    }

    fn required_inputs(&self) -> usize {
        self.interval()
    }
}

/// Least-squares line through the window, with x = 0 at the oldest
/// observation and x = `interval − 1` at the newest.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinRegValue<N: Num = f64> {
    pub slope: N,
    pub intercept: N,
    /// Value of the line at the newest observation (Tulip `linreg`). This
    /// is not a prediction of the next input, see [`LinRegValue::forecast`].
    pub fitted: N,
}

impl<N: Num> LinRegValue<N> {
    /// Predicted next value: the line extrapolated one observation past the
    /// window.
    #[inline]
    #[must_use]
    pub fn forecast(&self) -> N {
        self.fitted + self.slope
    }
}

/// Rolling Linear Regression.
///
/// Fits `y = intercept + slope × x` over the last `interval` observations.
/// An arithmetic window (constant first difference) is returned directly
/// instead of going through the normal equations.
///
/// # Example
///
/// ```
/// use streamta::{LinReg, LinRegConfig};
/// use std::num::NonZero;
///
/// let mut linreg: LinReg = LinReg::new(LinRegConfig::new(NonZero::new(3).unwrap()));
/// linreg.updates([2.0, 4.0], false);
///
/// let fit = linreg.add(6.0).unwrap();
/// assert_eq!(fit.slope, 2.0);
/// assert_eq!(fit.intercept, 2.0);
/// assert_eq!(fit.fitted, 6.0);
/// assert_eq!(fit.forecast(), 8.0);
/// ```
#[derive(Clone, Debug)]
pub struct LinReg<N: Num = f64> {
    config: LinRegConfig,
    window: Window<N>,
    sum_x: N,
    sum_xx: N,
    current: Option<LinRegValue<N>>,
}

impl<N: Num> LinReg<N> {
    fn fit(&self) -> LinRegValue<N> {
        let len = self.window.len();
        let last_x = N::from_usize(len - 1);

        if let Some(step) = self.common_difference() {
            let intercept = self.window.front().unwrap_or(N::ZERO);
            return LinRegValue {
                slope: step,
                intercept,
                fitted: intercept + step * last_x,
            };
        }

        let n = N::from_usize(len);
        let (sum_y, sum_xy) = self.window.iter().enumerate().fold(
            (N::ZERO, N::ZERO),
            |(sum_y, sum_xy), (i, &y)| (sum_y + y, sum_xy + N::from_usize(i) * y),
        );

        let slope = (n * sum_xy - self.sum_x * sum_y)
            .checked_div(n * self.sum_xx - self.sum_x * self.sum_x)
            .unwrap_or(N::ZERO);
        let intercept = (sum_y - slope * self.sum_x) / n;

        LinRegValue {
            slope,
            intercept,
            fitted: intercept + slope * last_x,
        }
    }

    /// `Some(step)` when consecutive observations differ by the same amount.
    fn common_difference(&self) -> Option<N> {
        let mut values = self.window.iter().copied();
        let first = values.next()?;
        let Some(second) = values.next() else {
            return Some(N::ZERO);
        };

        let step = second - first;
        let mut previous = second;
        for value in values {
            if value - previous != step {
                return None;
            }
            previous = value;
        }
        Some(step)
    }
}

impl<N: Num> Indicator for LinReg<N> {
    type Config = LinRegConfig;
    type Input = N;
    type Output = LinRegValue<N>;

    fn new(config: Self::Config) -> Self {
        let n = config.interval();
        // Σx and Σx² over 0..n
        let sum_x = N::from_usize(n * (n - 1) / 2);
        let sum_xx = N::from_usize((n - 1) * n * (2 * n - 1) / 6);

        Self {
            config,
            window: Window::new(n),
            sum_x,
            sum_xx,
            current: None,
        }
    }

    fn config(&self) -> &LinRegConfig {
        &self.config
    }

    fn update(&mut self, price: N, replace: bool) -> Option<Self::Output> {
        self.window.push_update(replace, price);
        self.current = self.window.is_full().then(|| self.fit());
        self.current
    }

    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl<N: Num> Display for LinReg<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LINREG({})", self.config.interval)
    }
}
