//! Settlement Domain
//!
//! Works out who owes whom within a group.
//!
//! 1. [`aggregate_balances`] sums what each member paid and owes and
//!    derives a net balance (positive: owed money, negative: owes money).
//! 2. [`SettlementSolver`] turns the balances into a short list of
//!    debtor-to-creditor payments.
//! 3. [`compute_group_balances`] runs both over a ledger snapshot and
//!    checks that the balances net to zero.
//!
//! Everything here is a pure function of the snapshot. Nothing is cached;
//! balances reflect exactly the expenses and splits passed in.
//!
//! # Examples
//!
//! ```rust
//! use domain_settlement::{compute_group_balances, SettlementOptions};
//! use domain_ledger::{ExpenseDraft, ExpenseCategory, LedgerSnapshot, Member};
//! use core_kernel::{Currency, GroupId, Money};
//! use rust_decimal_macros::dec;
//! use chrono::Utc;
//!
//! let alice = Member::new("Alice");
//! let bob = Member::new("Bob");
//! let mut snapshot = LedgerSnapshot::empty(GroupId::new(), Currency::USD);
//! snapshot.members = vec![alice.clone(), bob.clone()];
//!
//! let (expense, splits) = ExpenseDraft::new(
//!     snapshot.group_id,
//!     "Groceries",
//!     Money::new(dec!(80), Currency::USD),
//!     ExpenseCategory::Groceries,
//!     alice.id,
//! )
//! .split_equally(&[alice.id, bob.id])
//! .unwrap()
//! .into_records(Utc::now())
//! .unwrap();
//! snapshot.expenses.push(expense);
//! snapshot.splits.extend(splits);
//!
//! let report = compute_group_balances(&snapshot, &SettlementOptions::default()).unwrap();
//! assert_eq!(report.settlements.len(), 1);
//! assert_eq!(report.settlements[0].amount.amount(), dec!(40));
//! ```

pub mod balance;
pub mod solver;
pub mod report;
pub mod error;

pub use balance::{aggregate_balances, BalanceSheet, NetBalance};
pub use solver::{residual_balances, Settlement, SettlementSolver};
pub use report::{
    compute_group_balances, GroupBalances, Imbalance, ImbalancePolicy, SettlementOptions,
    IMBALANCE_TOLERANCE,
};
pub use error::SettlementError;
