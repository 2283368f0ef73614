//! Tests for spending insights and budget usage

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, DateRange, GroupId, MemberId, Money, MonthKey, Timezone};
use domain_insights::{
    compute_budget_usage, compute_monthly_insights, compute_spending_insights, InsightError,
};
use domain_ledger::{Budget, Expense, ExpenseCategory};

fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

fn spent(amount: Decimal, category: ExpenseCategory, y: i32, m: u32, d: u32, h: u32) -> Expense {
    Expense::new(GroupId::new(), "Item", usd(amount), MemberId::new(), category)
        .incurred_at(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Spending Insight Tests
// ============================================================================

mod spending_tests {
    use super::*;

    #[test]
    fn test_totals_by_category_and_day() {
        let expenses = vec![
            spent(dec!(40.00), ExpenseCategory::Groceries, 2024, 3, 1, 9),
            spent(dec!(12.50), ExpenseCategory::Dining, 2024, 3, 1, 20),
            spent(dec!(60.00), ExpenseCategory::Groceries, 2024, 3, 15, 10),
        ];
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();

        let insights = compute_spending_insights(&expenses, &range, &Timezone::default(), Currency::USD).unwrap();

        assert_eq!(insights.count, 3);
        assert_eq!(insights.total.amount(), dec!(112.50));
        assert_eq!(insights.average.amount(), dec!(37.50));
        assert_eq!(insights.by_category[&ExpenseCategory::Groceries].amount(), dec!(100.00));
        assert_eq!(insights.by_category[&ExpenseCategory::Dining].amount(), dec!(12.50));
        assert_eq!(insights.by_day[&date(2024, 3, 1)].amount(), dec!(52.50));
        assert_eq!(insights.by_day[&date(2024, 3, 15)].amount(), dec!(60.00));
        assert_eq!(insights.month, None);
    }

    #[test]
    fn test_range_is_inclusive_and_filters() {
        let expenses = vec![
            spent(dec!(1), ExpenseCategory::Other, 2024, 2, 29, 23),
            spent(dec!(2), ExpenseCategory::Other, 2024, 3, 1, 0),
            spent(dec!(4), ExpenseCategory::Other, 2024, 3, 31, 23),
            spent(dec!(8), ExpenseCategory::Other, 2024, 4, 1, 0),
        ];
        let insights = compute_monthly_insights(
            &expenses,
            MonthKey::new(2024, 3).unwrap(),
            &Timezone::default(),
            Currency::USD,
        )
        .unwrap();

        assert_eq!(insights.count, 2);
        assert_eq!(insights.total.amount(), dec!(6));
    }

    #[test]
    fn test_days_follow_timezone() {
        // 23:00 UTC on the 1st is already the 2nd in Tokyo
        let expenses = vec![spent(dec!(10), ExpenseCategory::Dining, 2024, 3, 1, 23)];
        let tokyo: Timezone = "Asia/Tokyo".parse().unwrap();
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();

        let insights = compute_spending_insights(&expenses, &range, &tokyo, Currency::USD).unwrap();
        assert!(insights.by_day.contains_key(&date(2024, 3, 2)));
        assert!(!insights.by_day.contains_key(&date(2024, 3, 1)));
    }

    #[test]
    fn test_json_shape() {
        let expenses = vec![spent(dec!(10), ExpenseCategory::Rent, 2024, 3, 5, 12)];
        let insights = compute_monthly_insights(
            &expenses,
            MonthKey::new(2024, 3).unwrap(),
            &Timezone::default(),
            Currency::USD,
        )
        .unwrap();

        let json = serde_json::to_value(&insights).unwrap();
        assert_eq!(json["month"], "2024-03");
        assert!(json["by_category"].get("rent").is_some());
        assert!(json["by_day"].get("2024-03-05").is_some());
    }
}

// ============================================================================
// Budget Usage Tests
// ============================================================================

mod budget_tests {
    use super::*;

    fn march() -> MonthKey {
        MonthKey::new(2024, 3).unwrap()
    }

    #[test]
    fn test_under_and_over_budget() {
        let group = GroupId::new();
        let expenses = vec![
            spent(dec!(150), ExpenseCategory::Groceries, 2024, 3, 3, 12),
            spent(dec!(90), ExpenseCategory::Dining, 2024, 3, 4, 12),
        ];
        let insights = compute_monthly_insights(&expenses, march(), &Timezone::default(), Currency::USD).unwrap();
        let budgets = vec![
            Budget::new(group, ExpenseCategory::Groceries, march(), usd(dec!(200))),
            Budget::new(group, ExpenseCategory::Dining, march(), usd(dec!(60))),
        ];

        let report = compute_budget_usage(&budgets, &insights).unwrap();

        let groceries = report.usage_for(ExpenseCategory::Groceries).unwrap();
        assert_eq!(groceries.remaining.amount(), dec!(50));
        assert_eq!(groceries.utilization_pct, Some(dec!(75)));
        assert!(!groceries.over_budget);

        let dining = report.usage_for(ExpenseCategory::Dining).unwrap();
        assert_eq!(dining.remaining.amount(), dec!(-30));
        assert_eq!(dining.utilization_pct, Some(dec!(150)));
        assert!(dining.over_budget);

        assert_eq!(report.over_budget().count(), 1);
        assert_eq!(report.total_limit.amount(), dec!(260));
        assert_eq!(report.total_spent.amount(), dec!(240));
        // ordered by category, not input order
        assert_eq!(report.categories[0].category, ExpenseCategory::Groceries);
    }

    #[test]
    fn test_budget_without_spending() {
        let insights = compute_monthly_insights(&[], march(), &Timezone::default(), Currency::USD).unwrap();
        let budget = Budget::new(GroupId::new(), ExpenseCategory::Utilities, march(), usd(dec!(80)));

        let report = compute_budget_usage(&[budget], &insights).unwrap();
        let usage = &report.categories[0];
        assert!(usage.spent.is_zero());
        assert_eq!(usage.utilization_pct, Some(dec!(0)));
    }

    #[test]
    fn test_other_month_rejected() {
        let insights = compute_monthly_insights(&[], march(), &Timezone::default(), Currency::USD).unwrap();
        let april = Budget::new(GroupId::new(), ExpenseCategory::Rent, MonthKey::new(2024, 4).unwrap(), usd(dec!(900)));

        assert!(matches!(
            compute_budget_usage(&[april], &insights),
            Err(InsightError::BudgetMonthMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let group = GroupId::new();
        let insights = compute_monthly_insights(&[], march(), &Timezone::default(), Currency::USD).unwrap();
        let budgets = vec![
            Budget::new(group, ExpenseCategory::Rent, march(), usd(dec!(900))),
            Budget::new(group, ExpenseCategory::Rent, march(), usd(dec!(950))),
        ];

        assert!(matches!(
            compute_budget_usage(&budgets, &insights),
            Err(InsightError::DuplicateBudget { .. })
        ));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn expense_strategy() -> impl Strategy<Value = Expense> {
    (0usize..ExpenseCategory::ALL.len(), 0i64..100_000, 1u32..=28, 0u32..24).prop_map(
        |(category, cents, day, hour)| {
            Expense::new(
                GroupId::new(),
                "Generated",
                Money::from_minor(cents, Currency::USD),
                MemberId::new(),
                ExpenseCategory::ALL[category],
            )
            .incurred_at(Utc.with_ymd_and_hms(2024, 2, day, hour, 0, 0).unwrap())
        },
    )
}

proptest! {
    #[test]
    fn prop_breakdowns_sum_to_total(expenses in prop::collection::vec(expense_strategy(), 0..40)) {
        let month = MonthKey::new(2024, 2).unwrap();
        let insights = compute_monthly_insights(&expenses, month, &Timezone::default(), Currency::USD).unwrap();

        let by_category: Decimal = insights.by_category.values().map(|m| m.amount()).sum();
        let by_day: Decimal = insights.by_day.values().map(|m| m.amount()).sum();
        prop_assert_eq!(by_category, insights.total.amount());
        prop_assert_eq!(by_day, insights.total.amount());
        prop_assert_eq!(insights.count, expenses.len());
    }

    #[test]
    fn prop_idempotent(expenses in prop::collection::vec(expense_strategy(), 0..40)) {
        let month = MonthKey::new(2024, 2).unwrap();
        let tz = Timezone::default();
        let first = compute_monthly_insights(&expenses, month, &tz, Currency::USD).unwrap();
        let second = compute_monthly_insights(&expenses, month, &tz, Currency::USD).unwrap();
        prop_assert_eq!(first, second);
    }
}
