//! Test Data Builders
//!
//! Describe a group by member name, then either build a [`LedgerSnapshot`]
//! for the pure computations or seed an [`InMemoryLedger`] for service
//! tests. Only the fields a test cares about need to be given.

use chrono::{DateTime, Utc};
use core_kernel::{Currency, GroupId, MemberId, Money, MonthKey};
use domain_ledger::{Budget, ExpenseCategory, ExpenseDraft, InMemoryLedger, LedgerSnapshot, Member};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::fixtures::TemporalFixtures;

enum Shares {
    Equal(Vec<String>),
    Exact(Vec<(String, Decimal)>),
}

struct ExpenseSpec {
    title: String,
    payer: String,
    amount: Decimal,
    category: ExpenseCategory,
    incurred_at: DateTime<Utc>,
    shares: Shares,
}

struct BudgetSpec {
    category: ExpenseCategory,
    month: MonthKey,
    limit: Decimal,
}

/// Builder for a group with members, expenses and budgets
pub struct TestGroupBuilder {
    currency: Currency,
    members: Vec<String>,
    expenses: Vec<ExpenseSpec>,
    budgets: Vec<BudgetSpec>,
    category: ExpenseCategory,
    incurred_at: DateTime<Utc>,
}

impl Default for TestGroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGroupBuilder {
    /// A USD group; expenses default to `other` on 2024-03-15
    pub fn new() -> Self {
        Self {
            currency: Currency::USD,
            members: Vec::new(),
            expenses: Vec::new(),
            budgets: Vec::new(),
            category: ExpenseCategory::Other,
            incurred_at: TemporalFixtures::march_2024_day(15),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Adds members by display name
    pub fn with_members(mut self, names: &[&str]) -> Self {
        self.members.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Category used by subsequent expenses
    pub fn in_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    /// Timestamp used by subsequent expenses
    pub fn on(mut self, incurred_at: DateTime<Utc>) -> Self {
        self.incurred_at = incurred_at;
        self
    }

    /// An expense split equally between `between`
    pub fn equal_expense(mut self, payer: &str, amount: Decimal, between: &[&str]) -> Self {
        self.expenses.push(ExpenseSpec {
            title: format!("Expense {}", self.expenses.len() + 1),
            payer: payer.to_string(),
            amount,
            category: self.category,
            incurred_at: self.incurred_at,
            shares: Shares::Equal(between.iter().map(|n| n.to_string()).collect()),
        });
        self
    }

    /// An expense with explicit shares
    pub fn exact_expense(mut self, payer: &str, amount: Decimal, shares: &[(&str, Decimal)]) -> Self {
        self.expenses.push(ExpenseSpec {
            title: format!("Expense {}", self.expenses.len() + 1),
            payer: payer.to_string(),
            amount,
            category: self.category,
            incurred_at: self.incurred_at,
            shares: Shares::Exact(shares.iter().map(|(n, a)| (n.to_string(), *a)).collect()),
        });
        self
    }

    pub fn with_budget(mut self, category: ExpenseCategory, month: MonthKey, limit: Decimal) -> Self {
        self.budgets.push(BudgetSpec { category, month, limit });
        self
    }

    /// Builds an in-memory snapshot
    ///
    /// # Panics
    ///
    /// Panics if an expense names an unknown member or fails validation.
    pub fn build(self) -> TestGroup {
        let members: Vec<Member> = self.members.iter().map(|n| Member::new(n.clone())).collect();
        let ids = name_index(&members);
        let mut snapshot = LedgerSnapshot::empty(GroupId::new_v7(), self.currency);
        snapshot.members = members;

        for spec in &self.expenses {
            let draft = self.draft(snapshot.group_id, spec, &ids);
            let (expense, splits) = draft.into_records(spec.incurred_at).unwrap();
            snapshot.expenses.push(expense);
            snapshot.splits.extend(splits);
        }

        let budgets = self
            .budgets
            .iter()
            .map(|b| Budget::new(snapshot.group_id, b.category, b.month, self.money(b.limit)))
            .collect();

        TestGroup { snapshot, ids, budgets }
    }

    /// Creates the group in a fresh in-memory ledger
    ///
    /// # Panics
    ///
    /// Panics if the ledger rejects a member or expense.
    pub async fn seed(self) -> SeededGroup {
        let ledger = InMemoryLedger::new();
        let group_id = ledger.create_group(self.currency).await;

        let members: Vec<Member> = self.members.iter().map(|n| Member::new(n.clone())).collect();
        for member in &members {
            ledger.join(group_id, member.clone()).await.unwrap();
        }
        let ids = name_index(&members);

        for spec in &self.expenses {
            let draft = self.draft(group_id, spec, &ids);
            ledger.record_expense(draft, spec.incurred_at).await.unwrap();
        }
        for b in &self.budgets {
            ledger
                .add_budget(Budget::new(group_id, b.category, b.month, self.money(b.limit)))
                .await;
        }

        SeededGroup { ledger, group_id, ids }
    }

    fn draft(&self, group_id: GroupId, spec: &ExpenseSpec, ids: &HashMap<String, MemberId>) -> ExpenseDraft {
        let lookup = |name: &str| -> MemberId {
            *ids.get(name).unwrap_or_else(|| panic!("unknown member {name}"))
        };

        let draft = ExpenseDraft::new(
            group_id,
            spec.title.clone(),
            self.money(spec.amount),
            spec.category,
            lookup(&spec.payer),
        );

        match &spec.shares {
            Shares::Equal(names) => {
                let between: Vec<MemberId> = names.iter().map(|n| lookup(n)).collect();
                draft.split_equally(&between).unwrap()
            }
            Shares::Exact(shares) => shares
                .iter()
                .fold(draft, |d, (name, amount)| d.share(lookup(name), self.money(*amount))),
        }
    }

    fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.currency)
    }
}

fn name_index(members: &[Member]) -> HashMap<String, MemberId> {
    members.iter().map(|m| (m.display_name.clone(), m.id)).collect()
}

/// A built group with its snapshot
#[derive(Debug, Clone)]
pub struct TestGroup {
    pub snapshot: LedgerSnapshot,
    pub budgets: Vec<Budget>,
    ids: HashMap<String, MemberId>,
}

impl TestGroup {
    /// Member id by display name
    ///
    /// # Panics
    ///
    /// Panics for an unknown name.
    pub fn id(&self, name: &str) -> MemberId {
        self.ids[name]
    }
}

/// A group created inside an in-memory ledger
pub struct SeededGroup {
    pub ledger: InMemoryLedger,
    pub group_id: GroupId,
    ids: HashMap<String, MemberId>,
}

impl SeededGroup {
    /// Member id by display name
    ///
    /// # Panics
    ///
    /// Panics for an unknown name.
    pub fn id(&self, name: &str) -> MemberId {
        self.ids[name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ledger::LedgerPort;
    use rust_decimal_macros::dec;

    #[test]
    fn test_build_equal_split() {
        let group = TestGroupBuilder::new()
            .with_members(&["Alice", "Bob", "Carol"])
            .equal_expense("Alice", dec!(100), &["Alice", "Bob", "Carol"])
            .build();

        assert_eq!(group.snapshot.members.len(), 3);
        assert_eq!(group.snapshot.expenses.len(), 1);
        assert_eq!(group.snapshot.splits.len(), 3);
        assert_eq!(group.snapshot.expenses[0].payer_id, group.id("Alice"));
    }

    #[test]
    fn test_build_exact_split_and_budget() {
        let group = TestGroupBuilder::new()
            .with_members(&["Alice", "Bob"])
            .in_category(ExpenseCategory::Rent)
            .exact_expense("Bob", dec!(1000), &[("Alice", dec!(600)), ("Bob", dec!(400))])
            .with_budget(ExpenseCategory::Rent, TemporalFixtures::march_2024(), dec!(1200))
            .build();

        assert_eq!(group.snapshot.expenses[0].category, ExpenseCategory::Rent);
        assert_eq!(group.budgets.len(), 1);
    }

    #[tokio::test]
    async fn test_seed_ledger() {
        let seeded = TestGroupBuilder::new()
            .with_members(&["Alice", "Bob"])
            .equal_expense("Alice", dec!(50), &["Alice", "Bob"])
            .seed()
            .await;

        let snapshot = seeded.ledger.snapshot(seeded.group_id, None).await.unwrap();
        assert_eq!(snapshot.expenses.len(), 1);
        assert!(seeded
            .ledger
            .is_active_member(seeded.group_id, seeded.id("Bob"), None)
            .await
            .unwrap());
    }
}
