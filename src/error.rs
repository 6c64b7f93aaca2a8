use rust_decimal::Decimal;
use thiserror::Error;

/// Returned by [`Indicator::value_or_err`](crate::Indicator::value_or_err)
/// while the indicator has not seen enough observations to be stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not enough data: indicator needs at least {required} inputs")]
pub struct NotEnoughDataError {
    pub required: usize,
}

/// Invalid indicator configuration, reported by
/// [`IndicatorConfigBuilder::build`](crate::IndicatorConfigBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("short interval ({short}) must be less than long interval ({long})")]
    IntervalOrder { short: usize, long: usize },

    #[error("acceleration step ({step}) must be less than maximum ({max})")]
    AccelerationOrder { step: Decimal, max: Decimal },
}

/// Invalid textual observation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid number for {field}: {value:?} ({reason})")]
    InvalidNumber {
        field: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_enough_data_reports_required_inputs() {
        let err = NotEnoughDataError { required: 14 };
        assert_eq!(
            err.to_string(),
            "not enough data: indicator needs at least 14 inputs"
        );
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::Missing("interval").to_string(),
            "interval is required"
        );
        assert_eq!(
            ConfigError::IntervalOrder { short: 26, long: 12 }.to_string(),
            "short interval (26) must be less than long interval (12)"
        );
        assert_eq!(
            ConfigError::AccelerationOrder {
                step: Decimal::new(2, 1),
                max: Decimal::new(2, 1),
            }
            .to_string(),
            "acceleration step (0.2) must be less than maximum (0.2)"
        );
    }
}
