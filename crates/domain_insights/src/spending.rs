//! Spending insights
//!
//! Totals a group's expenses over a date range, overall and broken down by
//! category and by calendar day.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use core_kernel::{Currency, DateRange, Money, MoneyError, MonthKey, Rate, Timezone};
use domain_ledger::{Expense, ExpenseCategory};

use crate::error::InsightError;

/// Spending over one date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingInsights {
    /// Set when the range is a whole calendar month
    pub month: Option<MonthKey>,
    pub range: DateRange,
    pub currency: Currency,
    pub total: Money,
    pub count: usize,
    /// Zero when there are no expenses
    pub average: Money,
    pub by_category: BTreeMap<ExpenseCategory, Money>,
    /// Keyed by local calendar date, serialized as `YYYY-MM-DD`
    pub by_day: BTreeMap<NaiveDate, Money>,
}

impl SpendingInsights {
    /// Spending in one category, zero if none
    pub fn spent_on(&self, category: ExpenseCategory) -> Money {
        self.by_category
            .get(&category)
            .copied()
            .unwrap_or_else(|| Money::zero(self.currency))
    }

    /// Share of the total that went to `category`
    pub fn category_share(&self, category: ExpenseCategory) -> Option<Rate> {
        Rate::of(&self.spent_on(category), &self.total).ok().flatten()
    }

    /// Category with the highest spending; ties go to the first in category order
    pub fn top_category(&self) -> Option<(ExpenseCategory, Money)> {
        self.by_category
            .iter()
            .fold(None, |best: Option<(ExpenseCategory, Money)>, (category, amount)| match best {
                Some((_, top)) if top.amount() >= amount.amount() => best,
                _ => Some((*category, *amount)),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Default)]
struct Sums {
    total: Decimal,
    count: usize,
    by_category: BTreeMap<ExpenseCategory, Decimal>,
    by_day: BTreeMap<NaiveDate, Decimal>,
}

/// Rounds each bucket, then moves the rounding residue onto the bucket with
/// the largest exact amount so the buckets add up to `total`
fn rounded_buckets<K: Ord + Copy>(
    buckets: BTreeMap<K, Decimal>,
    total: Money,
    round: impl Fn(Decimal) -> Money,
) -> BTreeMap<K, Money> {
    let largest = buckets
        .iter()
        .fold(None, |best: Option<(K, Decimal)>, (key, amount)| match best {
            Some((_, top)) if top >= *amount => best,
            _ => Some((*key, *amount)),
        })
        .map(|(key, _)| key);

    let mut rounded: BTreeMap<K, Money> = buckets.into_iter().map(|(k, v)| (k, round(v))).collect();
    let residue = rounded
        .values()
        .fold(total.amount(), |left, amount| left - amount.amount());
    if let Some(bucket) = largest.and_then(|key| rounded.get_mut(&key)) {
        *bucket = Money::new(bucket.amount() + residue, total.currency());
    }
    rounded
}

/// Totals expenses incurred within `range`
///
/// An expense is in range when its local date in `tz` falls between the
/// range's first and last day inclusive; everything else is ignored. Sums
/// are exact and each reported amount is rounded to the currency's minor
/// unit once. Any sub-unit residue from rounding the breakdowns lands on
/// the largest bucket, so `by_category` and `by_day` each sum to `total`.
///
/// # Errors
///
/// `Money(CurrencyMismatch)` if an in-range expense is not in `currency`.
pub fn compute_spending_insights(
    expenses: &[Expense],
    range: &DateRange,
    tz: &Timezone,
    currency: Currency,
) -> Result<SpendingInsights, InsightError> {
    let mut sums = Sums::default();

    for expense in expenses {
        let day = tz.local_date(expense.incurred_at);
        if !range.contains(day) {
            continue;
        }
        if expense.amount.currency() != currency {
            return Err(MoneyError::CurrencyMismatch(
                currency.to_string(),
                expense.amount.currency().to_string(),
            )
            .into());
        }

        let amount = expense.amount.amount();
        sums.total += amount;
        sums.count += 1;
        *sums.by_category.entry(expense.category).or_default() += amount;
        *sums.by_day.entry(day).or_default() += amount;
    }

    let round = |amount: Decimal| {
        Money::new(
            amount.round_dp_with_strategy(currency.decimal_places(), RoundingStrategy::MidpointAwayFromZero),
            currency,
        )
    };
    let average = if sums.count == 0 {
        Money::zero(currency)
    } else {
        round(sums.total / Decimal::from(sums.count))
    };

    debug!(
        start = %range.start,
        end = %range.end,
        count = sums.count,
        "spending insights computed"
    );

    let total = round(sums.total);
    Ok(SpendingInsights {
        month: None,
        range: *range,
        currency,
        total,
        count: sums.count,
        average,
        by_category: rounded_buckets(sums.by_category, total, round),
        by_day: rounded_buckets(sums.by_day, total, round),
    })
}

/// Totals expenses for one calendar month and labels the result with it
pub fn compute_monthly_insights(
    expenses: &[Expense],
    month: MonthKey,
    tz: &Timezone,
    currency: Currency,
) -> Result<SpendingInsights, InsightError> {
    let mut insights = compute_spending_insights(expenses, &DateRange::for_month(month), tz, currency)?;
    insights.month = Some(month);
    Ok(insights)
}
