use crate::{Num, Window};

/// Trailing window with an incrementally maintained sum (and optionally sum of
/// squares), giving O(1) mean and variance per observation.
#[derive(Clone, Debug)]
pub(crate) struct PriceWindow<N: Num, const SUM_OF_SQUARES: bool = false> {
    window: Window<N>,
    /// Running sum of values in the window. On the f64 track this may
    /// accumulate rounding drift over very long runs, negligible for typical
    /// window sizes on financial data. The decimal track is exact.
    sum: N,
    sum_of_squares: N,
}

pub(crate) type PriceWindowWithSumOfSquares<N> = PriceWindow<N, true>;

impl<N: Num, const SUM_OF_SQUARES: bool> PriceWindow<N, SUM_OF_SQUARES> {
    pub fn new(size: usize) -> Self {
        Self {
            window: Window::new(size),
            sum: N::ZERO,
            sum_of_squares: N::ZERO,
        }
    }

    #[inline]
    pub fn update(&mut self, value: N, replace: bool) {
        let replaced = if replace {
            self.window.replace_last(value)
        } else {
            None
        };

        let removed = match replaced {
            Some(old) => Some(old),
            None => self.window.push(value),
        };

        if let Some(old) = removed {
            self.sum -= old;
            if SUM_OF_SQUARES {
                self.sum_of_squares -= old * old;
            }
        }

        self.sum += value;
        if SUM_OF_SQUARES {
            self.sum_of_squares += value * value;
        }
    }

    #[inline]
    pub fn sum(&self) -> Option<N> {
        self.window.is_full().then_some(self.sum)
    }

    #[inline]
    pub fn mean(&self) -> Option<N> {
        self.sum()
            .map(|sum| sum / N::from_usize(self.window.capacity()))
    }

    #[inline]
    pub fn window(&self) -> &Window<N> {
        &self.window
    }
}

impl<N: Num> PriceWindow<N, true> {
    /// Population variance of a full window.
    #[inline]
    pub fn variance(&self) -> Option<N> {
        let mean = self.mean()?;
        let n = N::from_usize(self.window.capacity());

        Some((self.sum_of_squares / n - mean * mean).max(N::ZERO))
    }
}
