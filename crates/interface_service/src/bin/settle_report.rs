//! Settlement report for an exported ledger snapshot
//!
//! Reads a group's snapshot as JSON and prints its balances, suggested
//! settlements, and the spending insights for one month.
//!
//! # Usage
//!
//! ```bash
//! settle-report snapshot.json
//! settle-report snapshot.json 2024-03
//! cat snapshot.json | settle-report - 2024-03
//! ```
//!
//! # Environment Variables
//!
//! * `SETTLE_EPSILON` - Zero threshold for balances and transfers (default: 0.01)
//! * `SETTLE_IMBALANCE_TOLERANCE` - Largest tolerated net total (default: 0.05)
//! * `SETTLE_IMBALANCE_POLICY` - `warn` or `reject` (default: warn)
//! * `SETTLE_TIMEZONE` - IANA zone for calendar months (default: UTC)
//! * `SETTLE_LOG_LEVEL` - Log filter directive (default: info)
//! * `SETTLE_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use anyhow::Context;

use core_kernel::MonthKey;
use interface_service::{init_tracing, read_snapshot, ServiceConfig, SnapshotReport};

fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load().context("loading configuration")?;
    init_tracing(&config.log_level, config.log_format)?;

    let mut args = std::env::args().skip(1);
    let source = args
        .next()
        .context("usage: settle-report <snapshot.json | -> [YYYY-MM]")?;
    let month = match args.next() {
        Some(raw) => raw.parse::<MonthKey>()?,
        None => MonthKey::current(&config.timezone),
    };

    let snapshot = read_snapshot(&source)?;
    tracing::info!(group_id = %snapshot.group_id, %month, "building report");

    let report = SnapshotReport::build(&snapshot, month, &config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
