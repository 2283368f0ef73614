//! Offline report over an exported ledger snapshot
//!
//! Backs the `settle-report` binary: the snapshot arrives as JSON instead of
//! through the ledger port, so no caller authorization applies.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::Read;

use core_kernel::MonthKey;
use domain_insights::{compute_monthly_insights, SpendingInsights};
use domain_ledger::LedgerSnapshot;
use domain_settlement::{compute_group_balances, GroupBalances};

use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Balances, settlements and one month of insights for a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub balances: GroupBalances,
    pub insights: SpendingInsights,
}

impl SnapshotReport {
    pub fn build(snapshot: &LedgerSnapshot, month: MonthKey, config: &ServiceConfig) -> Result<Self, ServiceError> {
        let balances = compute_group_balances(snapshot, &config.settlement_options())?;
        let insights = compute_monthly_insights(&snapshot.expenses, month, &config.timezone, snapshot.currency)?;
        Ok(Self { balances, insights })
    }
}

/// Parses a snapshot exported as JSON
pub fn parse_snapshot(raw: &str) -> Result<LedgerSnapshot, ServiceError> {
    serde_json::from_str(raw).map_err(|e| ServiceError::BadRequest(format!("invalid ledger snapshot: {e}")))
}

/// Reads a snapshot from a file path, or from stdin when `source` is `-`
pub fn read_snapshot(source: &str) -> anyhow::Result<LedgerSnapshot> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {source}"))?
    };
    Ok(parse_snapshot(&raw)?)
}
