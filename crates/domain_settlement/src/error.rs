//! Settlement domain errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while computing balances and settlements
///
/// Every variant except `Imbalanced` is an input-contract violation: the
/// snapshot handed to the aggregator was not internally consistent.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// A split points at an expense that is not in the snapshot
    #[error("Split {split} references unknown expense {expense}")]
    UnknownExpense {
        split: String,
        expense: String,
    },

    /// A payer or split member is not in the member list
    #[error("{role} {member} is not a member of the group")]
    UnknownMember {
        role: &'static str,
        member: String,
    },

    /// An expense in the snapshot belongs to another group
    #[error("Expense {expense} belongs to group {actual}, expected {expected}")]
    ForeignExpense {
        expense: String,
        expected: String,
        actual: String,
    },

    /// The member list contains the same member twice
    #[error("Member {0} is listed more than once")]
    DuplicateMember(String),

    /// Two splits exist for the same expense and member
    #[error("Expense {expense} has more than one split for member {member}")]
    DuplicateSplit {
        expense: String,
        member: String,
    },

    /// An expense or split carries a negative amount
    #[error("{entity} {id} has negative amount {amount}")]
    NegativeAmount {
        entity: &'static str,
        id: String,
        amount: Decimal,
    },

    /// An amount is in a different currency than the group
    #[error("{entity} {id} is in {actual}, group uses {expected}")]
    CurrencyMismatch {
        entity: &'static str,
        id: String,
        expected: String,
        actual: String,
    },

    /// Balances do not sum to zero; splits upstream do not add up
    #[error("Group balances sum to {total}, exceeding tolerance {tolerance}")]
    Imbalanced {
        total: Decimal,
        tolerance: Decimal,
    },
}

impl SettlementError {
    pub fn unknown_member(role: &'static str, member: impl std::fmt::Display) -> Self {
        SettlementError::UnknownMember {
            role,
            member: member.to_string(),
        }
    }

    /// Whether the error means the ledger data itself is inconsistent,
    /// rather than merely failing to net to zero
    pub fn is_integrity_violation(&self) -> bool {
        !matches!(self, SettlementError::Imbalanced { .. })
    }
}
