use std::fmt::Display;

use crate::{Indicator, Num, Register};

/// Wraps a scalar indicator and records the highest and lowest result it has
/// produced, with the same single-step undo on replace.
///
/// ```
/// use streamta::{Indicator, Sma, SmaConfig, Tracked};
/// use std::num::NonZero;
///
/// let mut sma: Tracked<Sma> = Tracked::new(SmaConfig::new(NonZero::new(2).unwrap()));
/// sma.updates([1.0, 5.0, 3.0, 1.0], false);
///
/// assert_eq!(sma.highest(), Some(4.0));
/// assert_eq!(sma.lowest(), Some(2.0));
/// ```
#[derive(Clone, Debug)]
pub struct Tracked<I: Indicator> {
    indicator: I,
    highest: Register<I::Output>,
    lowest: Register<I::Output>,
}

impl<I> Tracked<I>
where
    I: Indicator,
    I::Output: Num,
{
    /// Highest result so far.
    #[must_use]
    pub fn highest(&self) -> Option<I::Output> {
        self.highest.get()
    }

    /// Lowest result so far.
    #[must_use]
    pub fn lowest(&self) -> Option<I::Output> {
        self.lowest.get()
    }

    /// The wrapped indicator.
    #[must_use]
    pub fn inner(&self) -> &I {
        &self.indicator
    }
}

fn extreme<N: Num>(
    register: &mut Register<N>,
    result: Option<N>,
    replace: bool,
    pick: fn(N, N) -> N,
) {
    let next = match (register.base(replace), result) {
        (Some(extreme), Some(result)) => Some(pick(extreme, result)),
        (extreme, result) => extreme.or(result),
    };

    match next {
        Some(value) => register.set(value, replace),
        None => register.clear(replace),
    }
}

impl<I> Indicator for Tracked<I>
where
    I: Indicator,
    I::Output: Num,
{
    type Config = I::Config;
    type Input = I::Input;
    type Output = I::Output;

    fn new(config: Self::Config) -> Self {
        Self {
            indicator: I::new(config),
            highest: Register::default(),
            lowest: Register::default(),
        }
    }

    fn config(&self) -> &Self::Config {
        self.indicator.config()
    }

    fn update(&mut self, input: Self::Input, replace: bool) -> Option<Self::Output> {
        let result = self.indicator.update(input, replace);
        extreme(&mut self.highest, result, replace, <I::Output as Num>::max);
        extreme(&mut self.lowest, result, replace, <I::Output as Num>::min);
        result
    }

    fn value(&self) -> Option<Self::Output> {
        self.indicator.value()
    }
}

impl<I> Display for Tracked<I>
where
    I: Indicator,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tracked({})", self.indicator)
    }
}
