//! Ledger entities
//!
//! These records are owned by the external document store. The core only
//! reads them: a [`LedgerSnapshot`] is everything the settlement and
//! insight computations need for one group, fetched in one step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{
    BudgetId, Currency, ExpenseId, GroupId, MemberId, Money, MonthKey, SplitId,
};

/// A member of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
}

impl Member {
    /// Creates a member with a fresh identifier
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new_v7(),
            display_name: display_name.into(),
        }
    }

    /// Creates a member with a known identifier
    pub fn with_id(id: MemberId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Groceries,
    Utilities,
    Rent,
    Dining,
    Transportation,
    Entertainment,
    Household,
    Healthcare,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Groceries,
        ExpenseCategory::Utilities,
        ExpenseCategory::Rent,
        ExpenseCategory::Dining,
        ExpenseCategory::Transportation,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Household,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Groceries => "groceries",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Dining => "dining",
            ExpenseCategory::Transportation => "transportation",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Household => "household",
            ExpenseCategory::Healthcare => "healthcare",
            ExpenseCategory::Other => "other",
        }
    }
}

impl Default for ExpenseCategory {
    fn default() -> Self {
        ExpenseCategory::Other
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown expense category: {s}"))
    }
}

/// A shared expense paid by one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub title: String,
    pub description: Option<String>,
    pub amount: Money,
    pub payer_id: MemberId,
    pub category: ExpenseCategory,
    /// When the expense was incurred
    pub incurred_at: DateTime<Utc>,
    pub is_settled: bool,
}

impl Expense {
    /// Creates an unsettled expense dated now
    pub fn new(
        group_id: GroupId,
        title: impl Into<String>,
        amount: Money,
        payer_id: MemberId,
        category: ExpenseCategory,
    ) -> Self {
        Self {
            id: ExpenseId::new_v7(),
            group_id,
            title: title.into(),
            description: None,
            amount,
            payer_id,
            category,
            incurred_at: Utc::now(),
            is_settled: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn incurred_at(mut self, at: DateTime<Utc>) -> Self {
        self.incurred_at = at;
        self
    }

    /// Timestamp in epoch milliseconds, as stored by the document store
    pub fn timestamp_ms(&self) -> i64 {
        self.incurred_at.timestamp_millis()
    }

    pub fn mark_settled(&mut self) {
        self.is_settled = true;
    }
}

/// One member's share of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub id: SplitId,
    pub expense_id: ExpenseId,
    pub member_id: MemberId,
    pub amount: Money,
    pub is_paid: bool,
}

impl Split {
    pub fn new(expense_id: ExpenseId, member_id: MemberId, amount: Money) -> Self {
        Self {
            id: SplitId::new_v7(),
            expense_id,
            member_id,
            amount,
            is_paid: false,
        }
    }

    pub fn mark_paid(&mut self) {
        self.is_paid = true;
    }
}

/// Monthly spending limit for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub group_id: GroupId,
    pub category: ExpenseCategory,
    pub month: MonthKey,
    pub monthly_limit: Money,
}

impl Budget {
    pub fn new(
        group_id: GroupId,
        category: ExpenseCategory,
        month: MonthKey,
        monthly_limit: Money,
    ) -> Self {
        Self {
            id: BudgetId::new_v7(),
            group_id,
            category,
            month,
            monthly_limit,
        }
    }
}

/// A consistent read of one group's ledger
///
/// Splits must belong to the expenses in the same snapshot; pulling them
/// from separate reads can pair a split with an expense that was removed
/// in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub group_id: GroupId,
    pub currency: Currency,
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
    pub splits: Vec<Split>,
}

impl LedgerSnapshot {
    /// An empty snapshot for a group
    pub fn empty(group_id: GroupId, currency: Currency) -> Self {
        Self {
            group_id,
            currency,
            members: Vec::new(),
            expenses: Vec::new(),
            splits: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.expenses.is_empty()
    }

    /// Looks up a member by id
    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }
}
