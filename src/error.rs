//! Error types for the ownership model

use thiserror::Error;

/// Errors raised by the amortization and comparison engines and the
/// config/report layers around them
#[derive(Debug, Error)]
pub enum ModelError {
    /// An input lies outside the domain the model is defined on
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        ModelError::InvalidParameter { name, value, reason }
    }
}

/// Reject NaN and infinities
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::invalid(name, value, "must be a finite number"))
    }
}

/// Reject negative (or non-finite) amounts and fee rates
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(ModelError::invalid(name, value, "must not be negative"));
    }
    Ok(())
}

/// Annual rates must stay above -100%, otherwise the monthly equivalent is undefined
pub(crate) fn ensure_rate(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value <= -1.0 {
        return Err(ModelError::invalid(name, value, "must be greater than -100%"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = ModelError::invalid("term_years", 0.0, "must be at least one year");
        assert_eq!(
            err.to_string(),
            "invalid parameter `term_years` = 0: must be at least one year"
        );
    }

    #[test]
    fn test_rate_bounds() {
        assert!(ensure_rate("annual_rate", -0.5).is_ok());
        assert!(ensure_rate("annual_rate", -1.0).is_err());
        assert!(ensure_rate("annual_rate", f64::NAN).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(ensure_non_negative("monthly_rent", 0.0).is_ok());
        assert!(ensure_non_negative("monthly_rent", -1.0).is_err());
        assert!(ensure_non_negative("monthly_rent", f64::INFINITY).is_err());
    }
}
