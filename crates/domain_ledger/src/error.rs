//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::MoneyError;

/// Errors raised while validating an expense before it is written
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Expense title is blank
    #[error("Expense title must not be empty")]
    EmptyTitle,

    /// Expense amount is zero or negative
    #[error("Invalid expense amount: {0}")]
    InvalidAmount(Decimal),

    /// Expense has no splits at all
    #[error("Expense must be split between at least one member")]
    NoSplits,

    /// The same member appears twice in one expense
    #[error("Member {0} appears more than once in the split")]
    DuplicateSplitMember(String),

    /// A split share is negative
    #[error("Split for member {member} has negative amount {amount}")]
    NegativeSplit {
        member: String,
        amount: Decimal,
    },

    /// Split shares do not add up to the expense amount
    #[error("Split amounts must sum to the expense amount: expected {expected}, got {actual}")]
    SplitSumMismatch {
        expected: Decimal,
        actual: Decimal,
    },

    /// Payer or split member is not an active member of the group
    #[error("Member {0} is not an active member of the group")]
    UnknownMember(String),

    /// Money arithmetic failed (currency mismatch, etc.)
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl LedgerError {
    pub fn unknown_member(id: impl std::fmt::Display) -> Self {
        LedgerError::UnknownMember(id.to_string())
    }
}
