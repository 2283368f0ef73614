//! Insights Domain
//!
//! Read-only reporting over a group's expenses:
//!
//! - [`compute_spending_insights`]: total, count, average, and sums by
//!   category and by day for a date range
//! - [`compute_monthly_insights`]: the same for a calendar month, labelled
//!   with the month
//! - [`compute_budget_usage`]: monthly category budgets against actual
//!   spending
//!
//! All functions are pure reductions; calling them twice on the same input
//! gives the same result.

pub mod spending;
pub mod budget;
pub mod error;

pub use spending::{compute_monthly_insights, compute_spending_insights, SpendingInsights};
pub use budget::{compute_budget_usage, BudgetReport, BudgetUsage};
pub use error::InsightError;
