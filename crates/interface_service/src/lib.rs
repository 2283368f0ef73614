//! Application Service Layer
//!
//! The seam a request handler calls. Each operation authorizes the caller,
//! reads a fresh snapshot through [`LedgerPort`](domain_ledger::LedgerPort),
//! and hands it to the pure computations in `domain_settlement` and
//! `domain_insights`.
//!
//! # Architecture
//!
//! - **Config**: `SETTLE_`-prefixed environment variables
//! - **Telemetry**: tracing subscriber with text or JSON output
//! - **Auth**: explicit caller identity checked against group membership
//! - **Services**: [`BalanceService`] and [`InsightService`]
//! - **Report**: [`SnapshotReport`] over an exported snapshot, for `settle-report`
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_service::{BalanceService, CallerId, ServiceConfig};
//!
//! let config = Arc::new(ServiceConfig::load()?);
//! let balances = BalanceService::new(ledger, config);
//! let report = balances.group_balances(CallerId::from(member_id), group_id).await?;
//! ```

pub mod config;
pub mod telemetry;
pub mod auth;
pub mod error;
pub mod balances;
pub mod insights;
pub mod report;

pub use config::ServiceConfig;
pub use telemetry::{init_tracing, LogFormat};
pub use auth::{require_member, CallerId};
pub use error::{ErrorResponse, ServiceError};
pub use balances::BalanceService;
pub use insights::InsightService;
pub use report::{parse_snapshot, read_snapshot, SnapshotReport};
