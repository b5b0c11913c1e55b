/// Error handling for the strategy engine
///
/// Validation failures abort a run before any simulation happens and are
/// surfaced to the caller; every in-band condition (horizon saturation,
/// zero extra payment, empty refinance subset) travels as a soft warning
/// on the output instead.
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Validation errors raised by the orchestrator before simulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("monthly debt budget must be positive, got {budget}")]
    NonPositiveBudget { budget: Decimal },

    #[error("monthly debt budget {budget} does not cover the {required} needed for minimum payments")]
    BudgetBelowMinimums { budget: Decimal, required: Decimal },

    #[error("invalid debt '{name}': {reason}")]
    InvalidDebt { name: String, reason: String },

    #[error("refinance term must be at least one month, got {term_months}")]
    InvalidRefinanceTerm { term_months: u32 },
}

impl EngineError {
    /// Build an `InvalidDebt` from a field violation
    pub fn invalid_debt(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidDebt {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Error category for monitoring and alerting
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::NonPositiveBudget { .. } | EngineError::BudgetBelowMinimums { .. } => {
                ErrorCategory::Budget
            }
            EngineError::InvalidDebt { .. } => ErrorCategory::Debt,
            EngineError::InvalidRefinanceTerm { .. } => ErrorCategory::Refinance,
        }
    }
}

/// Error categories for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Budget,
    Debt,
    Refinance,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Budget => write!(f, "budget"),
            ErrorCategory::Debt => write!(f, "debt"),
            ErrorCategory::Refinance => write!(f, "refinance"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = EngineError::NonPositiveBudget { budget: dec!(0) };
        assert_eq!(err.to_string(), "monthly debt budget must be positive, got 0");

        let err = EngineError::BudgetBelowMinimums {
            budget: dec!(300),
            required: dec!(350),
        };
        assert!(err.to_string().contains("does not cover"));
    }

    #[test]
    fn test_error_categories() {
        let budget = EngineError::NonPositiveBudget { budget: dec!(-1) };
        assert_eq!(budget.category(), ErrorCategory::Budget);

        let debt = EngineError::invalid_debt("Visa", "balance must not be negative");
        assert_eq!(debt.category(), ErrorCategory::Debt);

        let refi = EngineError::InvalidRefinanceTerm { term_months: 0 };
        assert_eq!(refi.category(), ErrorCategory::Refinance);
    }
}
