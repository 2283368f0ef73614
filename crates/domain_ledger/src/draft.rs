//! Expense write-path validation
//!
//! An [`ExpenseDraft`] is what a user submits when adding an expense. It is
//! validated before anything reaches the store so that every persisted
//! expense satisfies the split-sum invariant the balance computation relies
//! on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use core_kernel::{GroupId, MemberId, Money, EPSILON};

use crate::error::LedgerError;
use crate::model::{Expense, ExpenseCategory, Member, Split};

/// One member's requested share of a new expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    pub member_id: MemberId,
    pub amount: Money,
}

/// Divides `amount` equally between `members` in minor units
///
/// The last member absorbs the rounding remainder, so the shares always add
/// up to `amount` exactly.
///
/// # Errors
///
/// Returns `NoSplits` if `members` is empty.
pub fn split_equally(amount: &Money, members: &[MemberId]) -> Result<Vec<SplitShare>, LedgerError> {
    if members.is_empty() {
        return Err(LedgerError::NoSplits);
    }

    let parts = amount.allocate(members.len() as u32)?;
    Ok(members
        .iter()
        .zip(parts)
        .map(|(member_id, amount)| SplitShare {
            member_id: *member_id,
            amount,
        })
        .collect())
}

/// A new expense awaiting validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub group_id: GroupId,
    pub title: String,
    pub description: Option<String>,
    pub amount: Money,
    pub category: ExpenseCategory,
    pub payer_id: MemberId,
    pub shares: Vec<SplitShare>,
}

impl ExpenseDraft {
    pub fn new(
        group_id: GroupId,
        title: impl Into<String>,
        amount: Money,
        category: ExpenseCategory,
        payer_id: MemberId,
    ) -> Self {
        Self {
            group_id,
            title: title.into(),
            description: None,
            amount,
            category,
            payer_id,
            shares: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an explicit share
    pub fn share(mut self, member_id: MemberId, amount: Money) -> Self {
        self.shares.push(SplitShare { member_id, amount });
        self
    }

    /// Replaces the shares with an equal split between `members`
    pub fn split_equally(mut self, members: &[MemberId]) -> Result<Self, LedgerError> {
        self.shares = split_equally(&self.amount, members)?;
        Ok(self)
    }

    /// Checks the draft on its own, without knowing the group's members
    ///
    /// # Errors
    ///
    /// - `EmptyTitle` if the title is blank
    /// - `InvalidAmount` if the amount is not positive
    /// - `NoSplits`, `DuplicateSplitMember` or `NegativeSplit` for bad shares
    /// - `SplitSumMismatch` if the shares differ from the amount by more than a cent
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.title.trim().is_empty() {
            return Err(LedgerError::EmptyTitle);
        }
        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(self.amount.amount()));
        }
        if self.shares.is_empty() {
            return Err(LedgerError::NoSplits);
        }

        let mut seen = HashSet::with_capacity(self.shares.len());
        for share in &self.shares {
            if !seen.insert(share.member_id) {
                return Err(LedgerError::DuplicateSplitMember(share.member_id.to_string()));
            }
            if share.amount.is_negative() {
                return Err(LedgerError::NegativeSplit {
                    member: share.member_id.to_string(),
                    amount: share.amount.amount(),
                });
            }
        }

        let shares: Vec<Money> = self.shares.iter().map(|s| s.amount).collect();
        let total = Money::try_sum(&shares, self.amount.currency())?;
        if !total.approx_eq(&self.amount, EPSILON) {
            return Err(LedgerError::SplitSumMismatch {
                expected: self.amount.amount(),
                actual: total.amount(),
            });
        }

        Ok(())
    }

    /// Validates the draft and checks every referenced member belongs to the group
    pub fn validate_against(&self, members: &[Member]) -> Result<(), LedgerError> {
        self.validate()?;

        let known: HashSet<MemberId> = members.iter().map(|m| m.id).collect();
        if !known.contains(&self.payer_id) {
            return Err(LedgerError::unknown_member(self.payer_id));
        }
        if let Some(share) = self.shares.iter().find(|s| !known.contains(&s.member_id)) {
            return Err(LedgerError::unknown_member(share.member_id));
        }
        Ok(())
    }

    /// Turns a valid draft into the records to persist
    ///
    /// The payer's own share is marked paid, since they already covered it.
    pub fn into_records(self, incurred_at: DateTime<Utc>) -> Result<(Expense, Vec<Split>), LedgerError> {
        self.validate()?;

        let mut expense = Expense::new(
            self.group_id,
            self.title,
            self.amount,
            self.payer_id,
            self.category,
        )
        .incurred_at(incurred_at);
        expense.description = self.description;

        let splits: Vec<Split> = self
            .shares
            .into_iter()
            .map(|share| {
                let mut split = Split::new(expense.id, share.member_id, share.amount);
                if share.member_id == expense.payer_id {
                    split.mark_paid();
                }
                split
            })
            .collect();

        debug!(expense_id = %expense.id, splits = splits.len(), "expense draft accepted");
        Ok((expense, splits))
    }
}
