//! Insight queries

use std::sync::Arc;
use tracing::{info, instrument};

use core_kernel::{GroupId, MonthKey};
use domain_insights::{compute_budget_usage, compute_monthly_insights, BudgetReport, SpendingInsights};
use domain_ledger::LedgerPort;

use crate::auth::{require_member, CallerId};
use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Monthly spending reports for a caller's group
#[derive(Clone)]
pub struct InsightService {
    ledger: Arc<dyn LedgerPort>,
    config: Arc<ServiceConfig>,
}

impl InsightService {
    pub fn new(ledger: Arc<dyn LedgerPort>, config: Arc<ServiceConfig>) -> Self {
        Self { ledger, config }
    }

    /// Spending for `month`, or the current month in the configured zone
    #[instrument(skip_all, fields(%caller, %group_id))]
    pub async fn spending_insights(
        &self,
        caller: CallerId,
        group_id: GroupId,
        month: Option<MonthKey>,
    ) -> Result<SpendingInsights, ServiceError> {
        require_member(self.ledger.as_ref(), caller, group_id).await?;
        self.monthly(caller, group_id, self.resolve(month)).await
    }

    /// Category budgets for `month` against that month's spending
    #[instrument(skip_all, fields(%caller, %group_id))]
    pub async fn budget_usage(
        &self,
        caller: CallerId,
        group_id: GroupId,
        month: Option<MonthKey>,
    ) -> Result<BudgetReport, ServiceError> {
        require_member(self.ledger.as_ref(), caller, group_id).await?;

        let month = self.resolve(month);
        let insights = self.monthly(caller, group_id, month).await?;
        let budgets = self
            .ledger
            .list_budgets(group_id, month, Some(caller.metadata()))
            .await?;

        let report = compute_budget_usage(&budgets, &insights)?;
        info!(
            %month,
            budgets = report.categories.len(),
            over_budget = report.over_budget().count(),
            "budget usage computed"
        );
        Ok(report)
    }

    fn resolve(&self, month: Option<MonthKey>) -> MonthKey {
        month.unwrap_or_else(|| MonthKey::current(&self.config.timezone))
    }

    async fn monthly(
        &self,
        caller: CallerId,
        group_id: GroupId,
        month: MonthKey,
    ) -> Result<SpendingInsights, ServiceError> {
        let tz = &self.config.timezone;
        let metadata = Some(caller.metadata());

        let currency = self.ledger.group_currency(group_id, metadata.clone()).await?;
        let expenses = self.ledger.list_expenses(group_id, metadata).await?;

        Ok(compute_monthly_insights(&expenses, month, tz, currency)?)
    }
}
