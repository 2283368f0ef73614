//! Balance aggregation
//!
//! Reduces a ledger snapshot to one [`NetBalance`] per member. A positive
//! balance means the group owes the member money; negative means the
//! member owes the group.
//!
//! The aggregator trusts nothing about the snapshot: any split, payer or
//! expense that does not line up with the rest of the data fails the whole
//! computation instead of being skipped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use core_kernel::{Currency, ExpenseId, MemberId, Money};
use domain_ledger::LedgerSnapshot;

use crate::error::SettlementError;

/// One member's position in the group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalance {
    pub member_id: MemberId,
    /// Sum of expenses this member paid for
    pub total_paid: Money,
    /// Sum of this member's splits
    pub total_owed: Money,
    /// `total_paid - total_owed`
    pub balance: Money,
}

impl NetBalance {
    /// A member with no activity
    pub fn zero(member_id: MemberId, currency: Currency) -> Self {
        Self {
            member_id,
            total_paid: Money::zero(currency),
            total_owed: Money::zero(currency),
            balance: Money::zero(currency),
        }
    }

    /// Whether the member is owed more than `epsilon`
    pub fn is_creditor(&self, epsilon: Decimal) -> bool {
        self.balance.amount() > epsilon
    }

    /// Whether the member owes more than `epsilon`
    pub fn is_debtor(&self, epsilon: Decimal) -> bool {
        self.balance.amount() < -epsilon
    }

    /// Whether the balance is within `epsilon` of zero
    pub fn is_settled(&self, epsilon: Decimal) -> bool {
        self.balance.is_negligible(epsilon)
    }
}

/// Net balances for every member of a group, in member-list order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub currency: Currency,
    pub balances: Vec<NetBalance>,
}

impl BalanceSheet {
    /// Balance for one member, if they are in the sheet
    pub fn balance_for(&self, member_id: &MemberId) -> Option<&NetBalance> {
        self.balances.iter().find(|b| &b.member_id == member_id)
    }

    /// Sum of all balances; zero when every expense's splits add up
    pub fn net_total(&self) -> Decimal {
        self.balances.iter().map(|b| b.balance.amount()).sum()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

#[derive(Default)]
struct Totals {
    paid: Decimal,
    owed: Decimal,
}

/// Computes every member's paid, owed and net totals
///
/// Sums are exact; each output is rounded to the currency's minor unit
/// (half away from zero) once at the end. Whether a split is marked paid
/// has no effect on the balance.
///
/// # Errors
///
/// - `DuplicateMember` if a member is listed twice
/// - `ForeignExpense` if an expense belongs to another group
/// - `UnknownMember` if a payer or split member is not in the member list
/// - `UnknownExpense` if a split references an expense not in the snapshot
/// - `DuplicateSplit` for a second split on the same expense and member
/// - `NegativeAmount` for a negative expense or split
/// - `CurrencyMismatch` for money not in the group's currency
pub fn aggregate_balances(snapshot: &LedgerSnapshot) -> Result<BalanceSheet, SettlementError> {
    let currency = snapshot.currency;

    let mut index: HashMap<MemberId, usize> = HashMap::with_capacity(snapshot.members.len());
    for (position, member) in snapshot.members.iter().enumerate() {
        if index.insert(member.id, position).is_some() {
            return Err(SettlementError::DuplicateMember(member.id.to_string()));
        }
    }
    let mut totals: Vec<Totals> = snapshot.members.iter().map(|_| Totals::default()).collect();

    let mut expense_ids: HashSet<ExpenseId> = HashSet::with_capacity(snapshot.expenses.len());
    for expense in &snapshot.expenses {
        if expense.group_id != snapshot.group_id {
            return Err(SettlementError::ForeignExpense {
                expense: expense.id.to_string(),
                expected: snapshot.group_id.to_string(),
                actual: expense.group_id.to_string(),
            });
        }
        check_amount("Expense", expense.id, &expense.amount, currency)?;

        let slot = index
            .get(&expense.payer_id)
            .ok_or_else(|| SettlementError::unknown_member("Payer", expense.payer_id))?;
        totals[*slot].paid += expense.amount.amount();
        expense_ids.insert(expense.id);
    }

    let mut seen_splits: HashSet<(ExpenseId, MemberId)> = HashSet::with_capacity(snapshot.splits.len());
    for split in &snapshot.splits {
        if !expense_ids.contains(&split.expense_id) {
            return Err(SettlementError::UnknownExpense {
                split: split.id.to_string(),
                expense: split.expense_id.to_string(),
            });
        }
        if !seen_splits.insert((split.expense_id, split.member_id)) {
            return Err(SettlementError::DuplicateSplit {
                expense: split.expense_id.to_string(),
                member: split.member_id.to_string(),
            });
        }
        check_amount("Split", split.id, &split.amount, currency)?;

        let slot = index
            .get(&split.member_id)
            .ok_or_else(|| SettlementError::unknown_member("Split member", split.member_id))?;
        totals[*slot].owed += split.amount.amount();
    }

    let balances: Vec<NetBalance> = snapshot
        .members
        .iter()
        .zip(totals)
        .map(|(member, t)| NetBalance {
            member_id: member.id,
            total_paid: Money::new(t.paid, currency).round_to_currency(),
            total_owed: Money::new(t.owed, currency).round_to_currency(),
            balance: Money::new(t.paid - t.owed, currency).round_to_currency(),
        })
        .collect();

    debug!(
        group_id = %snapshot.group_id,
        members = balances.len(),
        expenses = snapshot.expenses.len(),
        splits = snapshot.splits.len(),
        "balances aggregated"
    );

    Ok(BalanceSheet { currency, balances })
}

fn check_amount(
    entity: &'static str,
    id: impl std::fmt::Display,
    amount: &Money,
    currency: Currency,
) -> Result<(), SettlementError> {
    if amount.currency() != currency {
        return Err(SettlementError::CurrencyMismatch {
            entity,
            id: id.to_string(),
            expected: currency.to_string(),
            actual: amount.currency().to_string(),
        });
    }
    if amount.is_negative() {
        return Err(SettlementError::NegativeAmount {
            entity,
            id: id.to_string(),
            amount: amount.amount(),
        });
    }
    Ok(())
}
