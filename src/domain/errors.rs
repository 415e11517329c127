// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Valuation error: {0}")]
    Valuation(#[from] ValuationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit code for this error category
    pub const fn exit_code(&self) -> u8 {
        match self {
            AppError::Valuation(err) => err.exit_code(),
            AppError::Config(_) => 3,
            AppError::Serialization(_) => 5,
            AppError::Io(_) => 10,
        }
    }
}

/// Errors raised by the valuation core.
///
/// Every variant is local to a single scenario or solve call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// Mathematically invalid input, e.g. a discount rate at or below terminal growth
    #[error("Domain error: {0}")]
    Domain(String),

    /// Malformed assumption data, e.g. mismatched sequence lengths
    #[error("Invalid assumptions: {0}")]
    Config(String),

    /// Implied-growth search hit its iteration ceiling
    #[error(
        "Implied growth search did not converge after {iterations} iterations (last bracket [{low}, {high}])"
    )]
    Convergence {
        low: f64,
        high: f64,
        iterations: usize,
    },
}

impl ValuationError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            ValuationError::Domain(_) => 2,
            ValuationError::Config(_) => 3,
            ValuationError::Convergence { .. } => 4,
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type ValuationResult<T> = Result<T, ValuationError>;

/// Reject NaN and infinities before they leak into a projection.
pub(crate) fn ensure_finite(name: &str, value: f64) -> ValuationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValuationError::Config(format!(
            "{} must be a finite number, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_category() {
        assert_eq!(AppError::from(ValuationError::Domain("x".into())).exit_code(), 2);
        assert_eq!(AppError::from(ValuationError::Config("x".into())).exit_code(), 3);
        let convergence = ValuationError::Convergence {
            low: 0.1,
            high: 0.2,
            iterations: 200,
        };
        assert_eq!(AppError::from(convergence).exit_code(), 4);
        assert_eq!(AppError::Config("bad".into()).exit_code(), 3);
    }

    #[test]
    fn convergence_message_reports_last_bracket() {
        let err = ValuationError::Convergence {
            low: 0.125,
            high: 0.25,
            iterations: 3,
        };
        let message = err.to_string();
        assert!(message.contains("3 iterations"));
        assert!(message.contains("[0.125, 0.25]"));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(ensure_finite("beta", 1.2).is_ok());
        assert!(matches!(
            ensure_finite("beta", f64::NAN),
            Err(ValuationError::Config(_))
        ));
        assert!(ensure_finite("beta", f64::INFINITY).is_err());
    }
}
