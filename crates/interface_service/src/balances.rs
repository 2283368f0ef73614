//! Balance queries

use std::sync::Arc;
use tracing::{info, instrument};

use core_kernel::{GroupId, MemberId};
use domain_ledger::LedgerPort;
use domain_settlement::{compute_group_balances, GroupBalances, NetBalance};

use crate::auth::{require_member, CallerId};
use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Computes balances and settlements for a caller's group
///
/// Each call reads a fresh snapshot; nothing is cached between calls.
#[derive(Clone)]
pub struct BalanceService {
    ledger: Arc<dyn LedgerPort>,
    config: Arc<ServiceConfig>,
}

impl BalanceService {
    pub fn new(ledger: Arc<dyn LedgerPort>, config: Arc<ServiceConfig>) -> Self {
        Self { ledger, config }
    }

    /// Every member's balance plus the suggested settlements
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the caller is not an active member
    /// - `Port` if the ledger read fails
    /// - `Settlement` if the snapshot is inconsistent, or imbalanced under
    ///   the reject policy
    #[instrument(skip_all, fields(%caller, %group_id))]
    pub async fn group_balances(
        &self,
        caller: CallerId,
        group_id: GroupId,
    ) -> Result<GroupBalances, ServiceError> {
        require_member(self.ledger.as_ref(), caller, group_id).await?;

        let snapshot = self.ledger.snapshot(group_id, Some(caller.metadata())).await?;
        let report = compute_group_balances(&snapshot, &self.config.settlement_options())?;

        info!(
            members = report.member_balances.len(),
            settlements = report.settlements.len(),
            imbalanced = report.imbalance.is_some(),
            "group balances computed"
        );
        Ok(report)
    }

    /// One member's balance within the group
    ///
    /// # Errors
    ///
    /// As [`Self::group_balances`], plus `NotFound` if `member_id` has never
    /// belonged to the group.
    #[instrument(skip_all, fields(%caller, %group_id, %member_id))]
    pub async fn member_balance(
        &self,
        caller: CallerId,
        group_id: GroupId,
        member_id: MemberId,
    ) -> Result<NetBalance, ServiceError> {
        let report = self.group_balances(caller, group_id).await?;

        report
            .member_balances
            .into_iter()
            .find(|b| b.member_id == member_id)
            .ok_or_else(|| ServiceError::NotFound(format!("member {member_id} in group {group_id}")))
    }
}
