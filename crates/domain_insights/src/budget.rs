//! Monthly budget usage
//!
//! Compares each category budget with what the group actually spent in
//! that category during the month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use core_kernel::{Money, MonthKey, Rate};
use domain_ledger::{Budget, ExpenseCategory};

use crate::error::InsightError;
use crate::spending::SpendingInsights;

/// How one category is tracking against its limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUsage {
    pub category: ExpenseCategory,
    pub limit: Money,
    pub spent: Money,
    /// Negative once the budget is exceeded
    pub remaining: Money,
    /// `spent / limit` as a percentage; `None` for a zero limit
    pub utilization_pct: Option<Decimal>,
    pub over_budget: bool,
}

/// Usage of every budget set for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetReport {
    pub month: MonthKey,
    /// Ordered by category
    pub categories: Vec<BudgetUsage>,
    pub total_limit: Money,
    /// Spending in budgeted categories only
    pub total_spent: Money,
}

impl BudgetReport {
    pub fn usage_for(&self, category: ExpenseCategory) -> Option<&BudgetUsage> {
        self.categories.iter().find(|u| u.category == category)
    }

    /// Categories that went over their limit
    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetUsage> {
        self.categories.iter().filter(|u| u.over_budget)
    }
}

/// Measures each budget against the month's spending
///
/// # Errors
///
/// - `NotMonthly` if the insights were not computed for a calendar month
/// - `BudgetMonthMismatch` if a budget belongs to another month
/// - `DuplicateBudget` if a category has two budgets
/// - `Money` if a limit is in a different currency than the spending
pub fn compute_budget_usage(
    budgets: &[Budget],
    insights: &SpendingInsights,
) -> Result<BudgetReport, InsightError> {
    let month = insights.month.ok_or(InsightError::NotMonthly)?;

    let mut seen = HashSet::with_capacity(budgets.len());
    let mut categories = Vec::with_capacity(budgets.len());
    let mut total_limit = Money::zero(insights.currency);
    let mut total_spent = Money::zero(insights.currency);

    for budget in budgets {
        if budget.month != month {
            return Err(InsightError::BudgetMonthMismatch {
                budget: budget.id.to_string(),
                expected: month.to_string(),
                actual: budget.month.to_string(),
            });
        }
        if !seen.insert(budget.category) {
            return Err(InsightError::DuplicateBudget {
                category: budget.category.to_string(),
                month: month.to_string(),
            });
        }

        let limit = budget.monthly_limit;
        let spent = insights.spent_on(budget.category);
        let remaining = limit.checked_sub(&spent)?;
        let utilization_pct = Rate::of(&spent, &limit)?.map(|r| r.as_percentage().round_dp(2));

        total_limit = total_limit.checked_add(&limit)?;
        total_spent = total_spent.checked_add(&spent)?;

        categories.push(BudgetUsage {
            category: budget.category,
            limit,
            spent,
            remaining,
            utilization_pct,
            over_budget: spent.amount() > limit.amount(),
        });
    }

    categories.sort_by_key(|u| u.category);

    Ok(BudgetReport {
        month,
        categories,
        total_limit,
        total_spent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spending::compute_monthly_insights;
    use core_kernel::{Currency, GroupId, Timezone};
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    #[test]
    fn test_requires_monthly_insights() {
        let month = MonthKey::new(2024, 3).unwrap();
        let mut insights = compute_monthly_insights(&[], month, &Timezone::default(), Currency::USD).unwrap();
        insights.month = None;

        assert!(matches!(
            compute_budget_usage(&[], &insights),
            Err(InsightError::NotMonthly)
        ));
    }

    #[test]
    fn test_zero_limit_has_no_utilization() {
        let month = MonthKey::new(2024, 3).unwrap();
        let insights = compute_monthly_insights(&[], month, &Timezone::default(), Currency::USD).unwrap();
        let budget = Budget::new(GroupId::new(), ExpenseCategory::Dining, month, usd(dec!(0)));

        let report = compute_budget_usage(&[budget], &insights).unwrap();
        let usage = report.usage_for(ExpenseCategory::Dining).unwrap();
        assert!(usage.utilization_pct.is_none());
        assert!(!usage.over_budget);
    }
}
