//! Ledger Domain Ports
//!
//! The ledger lives in an external document store. `LedgerPort` is the
//! read interface the core needs from it; adapters translate the store's
//! documents into the types in [`crate::model`].
//!
//! - **Store adapter**: queries the document store (lives with the web layer)
//! - **In-memory adapter**: [`mock::InMemoryLedger`], for tests and demos
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_ledger::ports::LedgerPort;
//! use std::sync::Arc;
//!
//! pub struct BalanceService {
//!     ledger: Arc<dyn LedgerPort>,
//! }
//!
//! impl BalanceService {
//!     pub async fn snapshot(&self, group_id: GroupId) -> Result<LedgerSnapshot, PortError> {
//!         self.ledger.snapshot(group_id, None).await
//!     }
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{Currency, DomainPort, GroupId, MemberId, MonthKey, OperationMetadata, PortError};

use crate::model::{Budget, Expense, LedgerSnapshot, Member, Split};

/// Read access to a group's ledger
#[async_trait]
pub trait LedgerPort: DomainPort {
    /// Currency the group keeps its books in
    ///
    /// # Errors
    ///
    /// `PortError::NotFound` if the group does not exist.
    async fn group_currency(
        &self,
        group_id: GroupId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Currency, PortError>;

    /// Everyone who has belonged to the group
    ///
    /// Former members are included so their past expenses and splits still
    /// resolve; use [`LedgerPort::is_active_member`] for access checks.
    async fn list_members(
        &self,
        group_id: GroupId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Member>, PortError>;

    /// All expenses recorded for the group
    async fn list_expenses(
        &self,
        group_id: GroupId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Expense>, PortError>;

    /// Splits belonging to the group's expenses
    async fn list_splits(
        &self,
        group_id: GroupId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Split>, PortError>;

    /// Budgets configured for the group in `month`
    async fn list_budgets(
        &self,
        group_id: GroupId,
        month: MonthKey,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Budget>, PortError>;

    /// Whether `member_id` is an active member of the group
    async fn is_active_member(
        &self,
        group_id: GroupId,
        member_id: MemberId,
        metadata: Option<OperationMetadata>,
    ) -> Result<bool, PortError>;

    /// Reads everything the balance computation needs for one group
    ///
    /// The default issues the four reads concurrently. Adapters whose store
    /// supports transactional reads should override this so the members,
    /// expenses and splits come from one consistent view.
    async fn snapshot(
        &self,
        group_id: GroupId,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerSnapshot, PortError> {
        let (currency, members, expenses, splits) = tokio::try_join!(
            self.group_currency(group_id, metadata.clone()),
            self.list_members(group_id, metadata.clone()),
            self.list_expenses(group_id, metadata.clone()),
            self.list_splits(group_id, metadata),
        )?;

        Ok(LedgerSnapshot {
            group_id,
            currency,
            members,
            expenses,
            splits,
        })
    }
}

/// In-memory implementation of LedgerPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult, HealthCheckable};

    use crate::draft::ExpenseDraft;
    use crate::error::LedgerError;

    #[derive(Debug, Clone)]
    struct GroupRecord {
        currency: Currency,
        members: Vec<(Member, bool)>,
    }

    #[derive(Debug, Default)]
    struct Store {
        groups: HashMap<GroupId, GroupRecord>,
        expenses: Vec<Expense>,
        splits: Vec<Split>,
        budgets: Vec<Budget>,
    }

    /// Ledger kept in process memory
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryLedger {
        store: Arc<RwLock<Store>>,
    }

    impl InMemoryLedger {
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates an empty group
        pub async fn create_group(&self, currency: Currency) -> GroupId {
            let group_id = GroupId::new_v7();
            self.store.write().await.groups.insert(
                group_id,
                GroupRecord {
                    currency,
                    members: Vec::new(),
                },
            );
            group_id
        }

        /// Adds an active member; joining twice reactivates the membership
        pub async fn join(&self, group_id: GroupId, member: Member) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            let group = store
                .groups
                .get_mut(&group_id)
                .ok_or_else(|| PortError::not_found("Group", group_id))?;

            match group.members.iter_mut().find(|(m, _)| m.id == member.id) {
                Some((_, active)) => *active = true,
                None => group.members.push((member, true)),
            }
            Ok(())
        }

        /// Marks a membership inactive
        pub async fn leave(&self, group_id: GroupId, member_id: MemberId) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            let group = store
                .groups
                .get_mut(&group_id)
                .ok_or_else(|| PortError::not_found("Group", group_id))?;
            let (_, active) = group
                .members
                .iter_mut()
                .find(|(m, _)| m.id == member_id)
                .ok_or_else(|| PortError::not_found("Member", member_id))?;
            *active = false;
            Ok(())
        }

        /// Validates a draft against the group's active members and stores it
        pub async fn record_expense(
            &self,
            draft: ExpenseDraft,
            incurred_at: DateTime<Utc>,
        ) -> Result<Expense, PortError> {
            let group_id = draft.group_id;
            let members: Vec<Member> = {
                let store = self.store.read().await;
                let group = store
                    .groups
                    .get(&group_id)
                    .ok_or_else(|| PortError::not_found("Group", group_id))?;
                group
                    .members
                    .iter()
                    .filter(|(_, active)| *active)
                    .map(|(m, _)| m.clone())
                    .collect()
            };
            draft
                .validate_against(&members)
                .map_err(|e: LedgerError| PortError::validation(e.to_string()))?;

            let (expense, splits) = draft
                .into_records(incurred_at)
                .map_err(|e| PortError::validation(e.to_string()))?;

            let mut store = self.store.write().await;
            store.expenses.push(expense.clone());
            store.splits.extend(splits);
            Ok(expense)
        }

        /// Stores records as given, bypassing validation
        pub async fn insert_raw(&self, expense: Expense, splits: Vec<Split>) {
            let mut store = self.store.write().await;
            store.expenses.push(expense);
            store.splits.extend(splits);
        }

        pub async fn add_budget(&self, budget: Budget) {
            self.store.write().await.budgets.push(budget);
        }
    }

    impl DomainPort for InMemoryLedger {}

    #[async_trait]
    impl HealthCheckable for InMemoryLedger {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "in-memory-ledger".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl LedgerPort for InMemoryLedger {
        async fn group_currency(
            &self,
            group_id: GroupId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Currency, PortError> {
            self.store
                .read()
                .await
                .groups
                .get(&group_id)
                .map(|g| g.currency)
                .ok_or_else(|| PortError::not_found("Group", group_id))
        }

        async fn list_members(
            &self,
            group_id: GroupId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<Member>, PortError> {
            let store = self.store.read().await;
            let group = store
                .groups
                .get(&group_id)
                .ok_or_else(|| PortError::not_found("Group", group_id))?;
            Ok(group.members.iter().map(|(m, _)| m.clone()).collect())
        }

        async fn list_expenses(
            &self,
            group_id: GroupId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<Expense>, PortError> {
            let store = self.store.read().await;
            Ok(store
                .expenses
                .iter()
                .filter(|e| e.group_id == group_id)
                .cloned()
                .collect())
        }

        async fn list_splits(
            &self,
            group_id: GroupId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<Split>, PortError> {
            let store = self.store.read().await;
            Ok(store
                .splits
                .iter()
                .filter(|s| {
                    store
                        .expenses
                        .iter()
                        .any(|e| e.id == s.expense_id && e.group_id == group_id)
                })
                .cloned()
                .collect())
        }

        async fn list_budgets(
            &self,
            group_id: GroupId,
            month: MonthKey,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<Budget>, PortError> {
            let store = self.store.read().await;
            Ok(store
                .budgets
                .iter()
                .filter(|b| b.group_id == group_id && b.month == month)
                .cloned()
                .collect())
        }

        async fn is_active_member(
            &self,
            group_id: GroupId,
            member_id: MemberId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<bool, PortError> {
            let store = self.store.read().await;
            Ok(store
                .groups
                .get(&group_id)
                .map(|g| g.members.iter().any(|(m, active)| *active && m.id == member_id))
                .unwrap_or(false))
        }

        async fn snapshot(
            &self,
            group_id: GroupId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<LedgerSnapshot, PortError> {
            // One read guard for the whole snapshot
            let store = self.store.read().await;
            let group = store
                .groups
                .get(&group_id)
                .ok_or_else(|| PortError::not_found("Group", group_id))?;

            let expenses: Vec<Expense> = store
                .expenses
                .iter()
                .filter(|e| e.group_id == group_id)
                .cloned()
                .collect();
            let splits = store
                .splits
                .iter()
                .filter(|s| expenses.iter().any(|e| e.id == s.expense_id))
                .cloned()
                .collect();

            Ok(LedgerSnapshot {
                group_id,
                currency: group.currency,
                members: group.members.iter().map(|(m, _)| m.clone()).collect(),
                expenses,
                splits,
            })
        }
    }
}
