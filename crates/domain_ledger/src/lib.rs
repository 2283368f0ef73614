//! Ledger Domain
//!
//! Records owned by the group's document store and the port the core reads
//! them through.
//!
//! # Records
//!
//! - **Member**: a person in a group
//! - **Expense**: an amount paid by one member on behalf of the group
//! - **Split**: one member's share of an expense
//! - **Budget**: a monthly spending limit for one category
//!
//! Expenses are written through an [`ExpenseDraft`], which enforces that the
//! splits add up to the expense amount within one cent.
//!
//! # Examples
//!
//! ```rust
//! use domain_ledger::{ExpenseDraft, ExpenseCategory, Member};
//! use core_kernel::{Currency, GroupId, Money};
//! use rust_decimal_macros::dec;
//! use chrono::Utc;
//!
//! let alice = Member::new("Alice");
//! let bob = Member::new("Bob");
//!
//! let (expense, splits) = ExpenseDraft::new(
//!     GroupId::new(),
//!     "Dinner",
//!     Money::new(dec!(90.00), Currency::USD),
//!     ExpenseCategory::Dining,
//!     alice.id,
//! )
//! .split_equally(&[alice.id, bob.id])
//! .unwrap()
//! .into_records(Utc::now())
//! .unwrap();
//!
//! assert_eq!(splits.len(), 2);
//! assert_eq!(expense.payer_id, alice.id);
//! ```

pub mod model;
pub mod draft;
pub mod error;
pub mod ports;

pub use model::{Budget, Expense, ExpenseCategory, LedgerSnapshot, Member, Split};
pub use draft::{split_equally, ExpenseDraft, SplitShare};
pub use error::LedgerError;
pub use ports::LedgerPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryLedger;
