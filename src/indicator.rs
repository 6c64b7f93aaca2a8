use crate::{ConfigError, NotEnoughDataError};

use rust_decimal::Decimal;

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (intervals, smoothing choice, multipliers). Configs are value types: cheap
/// to clone, compare, and hash. A config that exists has been validated, so
/// constructing an indicator from it cannot fail.
pub trait IndicatorConfig: Sized + Clone + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Number of accepted observations before the indicator is stable.
    ///
    /// Derived from the configuration only. Composite indicators combine the
    /// counts of their parts: the maximum for parts fed side by side, and
    /// `a + b − 1` when one part is fed the other's output.
    fn required_inputs(&self) -> usize;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Validates the collected parameters and builds the config.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required parameter is missing or the
    /// parameters are inconsistent with each other.
    fn build(self) -> Result<Config, ConfigError>;
}

/// A streaming technical indicator.
///
/// Indicators maintain internal state and update incrementally, one
/// observation per call. [`add`](Indicator::add) appends an observation;
/// [`replace`](Indicator::replace) supersedes the most recently accepted one
/// (a live, still-forming bar). Output is `None` until the indicator is
/// stable.
///
/// # Replace semantics
///
/// Exactly one level of undo is guaranteed: a replace rolls the indicator back
/// to its state before the latest add and applies the new observation
/// instead. Consecutive replaces therefore all correct the same observation;
/// nothing older than the latest add can be reached. A replace issued before
/// any add is treated as the first add.
///
/// # Example
///
/// ```
/// use streamta::{Indicator, Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let mut sma: Sma = Sma::new(SmaConfig::new(NonZero::new(3).unwrap()));
///
/// assert_eq!(sma.add(10.0), None);
/// assert_eq!(sma.add(20.0), None);
/// assert_eq!(sma.add(30.0), Some(20.0));
///
/// // the last bar was still forming
/// assert_eq!(sma.replace(60.0), Some(30.0));
/// assert!(sma.is_stable());
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Observation type: a scalar price or a [`Candle`](crate::Candle).
    type Input: Copy;

    /// Computed output type. A number for simple indicators, a record for
    /// composite ones (e.g. Bollinger Bands).
    type Output: Copy + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// The configuration this indicator was built from.
    fn config(&self) -> &Self::Config;

    /// Feeds one observation, appending it or replacing the latest one, and
    /// returns the updated value, or `None` if not yet stable.
    fn update(&mut self, input: Self::Input, replace: bool) -> Option<Self::Output>;

    /// Returns the last computed value without advancing state, or `None` if
    /// not yet stable.
    ///
    /// This is a cached field read, O(1) with no computation.
    fn value(&self) -> Option<Self::Output>;

    /// Appends a new observation.
    #[inline]
    fn add(&mut self, input: Self::Input) -> Option<Self::Output> {
        self.update(input, false)
    }

    /// Supersedes the most recently accepted observation.
    #[inline]
    fn replace(&mut self, input: Self::Input) -> Option<Self::Output> {
        self.update(input, true)
    }

    /// Feeds a batch in order, returning one result per input.
    fn updates<I>(&mut self, inputs: I, replace: bool) -> Vec<Option<Self::Output>>
    where
        I: IntoIterator<Item = Self::Input>,
    {
        inputs
            .into_iter()
            .map(|input| self.update(input, replace))
            .collect()
    }

    /// Number of accepted observations before the indicator is stable.
    #[inline]
    fn required_inputs(&self) -> usize {
        self.config().required_inputs()
    }

    /// `true` once a value is available.
    #[inline]
    fn is_stable(&self) -> bool {
        self.value().is_some()
    }

    /// Returns the current value.
    ///
    /// # Errors
    ///
    /// Returns [`NotEnoughDataError`] carrying
    /// [`required_inputs`](Indicator::required_inputs) while not stable.
    #[inline]
    fn value_or_err(&self) -> Result<Self::Output, NotEnoughDataError> {
        self.value().ok_or(NotEnoughDataError {
            required: self.required_inputs(),
        })
    }
}

/// Unwraps a parameter a builder requires.
pub(crate) fn require<T>(value: Option<T>, name: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::Missing(name))
}

/// Rejects zero and negative multipliers.
pub(crate) fn positive(value: Decimal, name: &'static str) -> Result<Decimal, ConfigError> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive(name))
    }
}
