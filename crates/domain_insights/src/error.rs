//! Insight domain errors

use thiserror::Error;

use core_kernel::{MoneyError, TemporalError};

#[derive(Debug, Error)]
pub enum InsightError {
    /// Budget usage needs insights computed for a whole month
    #[error("Budget usage requires monthly insights")]
    NotMonthly,

    /// A budget was set for a different month than the insights cover
    #[error("Budget {budget} is for {actual}, insights cover {expected}")]
    BudgetMonthMismatch {
        budget: String,
        expected: String,
        actual: String,
    },

    /// Two budgets for the same category in one month
    #[error("More than one {category} budget for {month}")]
    DuplicateBudget {
        category: String,
        month: String,
    },

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),
}
