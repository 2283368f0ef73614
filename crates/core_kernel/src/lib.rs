//! Core Kernel - Foundational types for the expense-sharing core
//!
//! This crate provides the building blocks used by every domain crate:
//! - Money types with precise decimal arithmetic and currency rounding
//! - Calendar types for day and month reporting windows
//! - Strongly typed identifiers
//! - Port error and marker traits for the data-access seam

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate, EPSILON};
pub use temporal::{DateRange, MonthKey, TemporalError, Timezone};
pub use identifiers::{GroupId, MemberId, ExpenseId, SplitId, BudgetId};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckable, HealthCheckResult,
    OperationMetadata,
};
