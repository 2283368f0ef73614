//! Property-Based Test Generators
//!
//! Proptest strategies for money and for whole group ledgers whose splits
//! always add up to their expense.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{Currency, Money};
use domain_ledger::ExpenseCategory;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::{TestGroup, TestGroupBuilder};

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::JPY),
        Just(Currency::CHF),
        Just(Currency::INR),
        Just(Currency::AUD),
        Just(Currency::CAD),
        Just(Currency::SGD),
        Just(Currency::HKD),
    ]
}

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for positive Money in any supported currency
pub fn money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for expense amounts as 2-dp decimals up to 5,000.00
pub fn expense_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

pub fn category_strategy() -> impl Strategy<Value = ExpenseCategory> {
    (0..ExpenseCategory::ALL.len()).prop_map(|i| ExpenseCategory::ALL[i])
}

/// Strategy for a timestamp within March 2024
pub fn march_2024_timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (1u32..=31, 0u32..24, 0u32..60)
        .prop_map(|(day, hour, minute)| Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap())
}

/// Member names used by generated groups
pub const MEMBER_NAMES: [&str; 6] = ["Ana", "Ben", "Cai", "Dev", "Eli", "Fay"];

/// One generated expense: payer index, amount, participant bitmask,
/// category and timestamp
pub type ExpenseShape = (usize, Decimal, u32, ExpenseCategory, DateTime<Utc>);

fn expense_shape_strategy(members: usize) -> impl Strategy<Value = ExpenseShape> {
    let full_mask = (1u32 << members) - 1;
    (
        0..members,
        expense_amount_strategy(),
        1u32..=full_mask,
        category_strategy(),
        march_2024_timestamp_strategy(),
    )
}

/// Strategy for a group of 1 to 6 members with up to `max_expenses`
/// equally split expenses
pub fn group_strategy(max_expenses: usize) -> impl Strategy<Value = TestGroup> {
    (1usize..=MEMBER_NAMES.len())
        .prop_flat_map(move |n| (Just(n), prop::collection::vec(expense_shape_strategy(n), 0..=max_expenses)))
        .prop_map(|(n, shapes)| {
            let names = &MEMBER_NAMES[..n];
            shapes.into_iter().fold(
                TestGroupBuilder::new().with_members(names),
                |builder, (payer, amount, mask, category, at)| {
                    let between: Vec<&str> = names
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| mask & (1 << i) != 0)
                        .map(|(_, name)| *name)
                        .collect();
                    builder
                        .in_category(category)
                        .on(at)
                        .equal_expense(names[payer], amount, &between)
                },
            )
            .build()
        })
}
