//! Group balance report
//!
//! Runs aggregation and the solver over one snapshot and checks that the
//! group's balances net to zero before handing out settlements.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use core_kernel::{Currency, GroupId, MemberId, Money, EPSILON};
use domain_ledger::LedgerSnapshot;

use crate::balance::{aggregate_balances, NetBalance};
use crate::error::SettlementError;
use crate::solver::{Settlement, SettlementSolver};

/// Largest net total tolerated before balances are considered corrupt
pub const IMBALANCE_TOLERANCE: Decimal = dec!(0.05);

/// What to do when balances do not net to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImbalancePolicy {
    /// Fail the computation
    Reject,
    /// Log a warning and return best-effort settlements
    #[default]
    Warn,
}

impl std::str::FromStr for ImbalancePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(ImbalancePolicy::Reject),
            "warn" => Ok(ImbalancePolicy::Warn),
            other => Err(format!("unknown imbalance policy: {other}")),
        }
    }
}

/// Tunables for one balance computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOptions {
    /// Threshold below which a balance or transfer counts as zero
    pub epsilon: Decimal,
    /// Largest tolerated net total across the group
    pub imbalance_tolerance: Decimal,
    pub imbalance_policy: ImbalancePolicy,
}

impl Default for SettlementOptions {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            imbalance_tolerance: IMBALANCE_TOLERANCE,
            imbalance_policy: ImbalancePolicy::default(),
        }
    }
}

impl SettlementOptions {
    pub fn with_policy(mut self, policy: ImbalancePolicy) -> Self {
        self.imbalance_policy = policy;
        self
    }
}

/// Net total found when balances failed to cancel out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Imbalance {
    pub total: Money,
    pub tolerance: Decimal,
}

/// Balances and suggested settlements for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBalances {
    pub group_id: GroupId,
    pub currency: Currency,
    /// One entry per member, in member-list order
    pub member_balances: Vec<NetBalance>,
    pub settlements: Vec<Settlement>,
    /// Present only when balances were out by more than the tolerance
    /// and the policy let the computation continue
    pub imbalance: Option<Imbalance>,
}

impl GroupBalances {
    pub fn balance_for(&self, member_id: &MemberId) -> Option<&NetBalance> {
        self.member_balances.iter().find(|b| &b.member_id == member_id)
    }

    /// Settlements the member has to pay
    pub fn payments_from(&self, member_id: &MemberId) -> impl Iterator<Item = &Settlement> + '_ {
        let member_id = *member_id;
        self.settlements.iter().filter(move |s| s.from == member_id)
    }

    /// Settlements the member will receive
    pub fn payments_to(&self, member_id: &MemberId) -> impl Iterator<Item = &Settlement> + '_ {
        let member_id = *member_id;
        self.settlements.iter().filter(move |s| s.to == member_id)
    }

    /// Whether nobody owes anything
    pub fn is_settled_up(&self) -> bool {
        self.settlements.is_empty()
    }
}

/// Computes every member's balance and the transfers that settle the group
///
/// # Arguments
///
/// * `snapshot` - Members, expenses and splits read together from the ledger
/// * `options` - Epsilon, imbalance tolerance and policy
///
/// # Errors
///
/// Any input-contract violation from [`aggregate_balances`], or
/// `Imbalanced` when balances are out by more than the tolerance under
/// `ImbalancePolicy::Reject`.
#[instrument(skip_all, fields(group_id = %snapshot.group_id))]
pub fn compute_group_balances(
    snapshot: &LedgerSnapshot,
    options: &SettlementOptions,
) -> Result<GroupBalances, SettlementError> {
    let sheet = aggregate_balances(snapshot)?;

    let total = sheet.net_total();
    let imbalance = if total.abs() > options.imbalance_tolerance {
        match options.imbalance_policy {
            ImbalancePolicy::Reject => {
                return Err(SettlementError::Imbalanced {
                    total,
                    tolerance: options.imbalance_tolerance,
                });
            }
            ImbalancePolicy::Warn => {
                warn!(
                    %total,
                    tolerance = %options.imbalance_tolerance,
                    "group balances do not net to zero; settlements are best effort"
                );
                Some(Imbalance {
                    total: Money::new(total, sheet.currency),
                    tolerance: options.imbalance_tolerance,
                })
            }
        }
    } else {
        None
    };

    let settlements = SettlementSolver::new(options.epsilon).solve(&sheet.balances);

    Ok(GroupBalances {
        group_id: snapshot.group_id,
        currency: sheet.currency,
        member_balances: sheet.balances,
        settlements,
        imbalance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ledger::{Expense, ExpenseCategory, Member, Split};

    fn lopsided_snapshot() -> (LedgerSnapshot, Member, Member) {
        let alice = Member::new("Alice");
        let bob = Member::new("Bob");
        let mut snapshot = LedgerSnapshot::empty(GroupId::new(), Currency::USD);
        snapshot.members = vec![alice.clone(), bob.clone()];

        // splits only cover 90 of a 100 expense
        let expense = Expense::new(
            snapshot.group_id,
            "Broken",
            Money::new(dec!(100), Currency::USD),
            alice.id,
            ExpenseCategory::Other,
        );
        snapshot.splits.push(Split::new(expense.id, alice.id, Money::new(dec!(45), Currency::USD)));
        snapshot.splits.push(Split::new(expense.id, bob.id, Money::new(dec!(45), Currency::USD)));
        snapshot.expenses.push(expense);
        (snapshot, alice, bob)
    }

    /// Alice pays 10.00 and Bob's split covers only `covered` of it
    fn short_snapshot(covered: Decimal) -> LedgerSnapshot {
        let (mut snapshot, alice, bob) = lopsided_snapshot();
        snapshot.splits.clear();
        snapshot.expenses.clear();
        let expense = Expense::new(
            snapshot.group_id,
            "Parking",
            Money::new(dec!(10.00), Currency::USD),
            alice.id,
            ExpenseCategory::Transportation,
        );
        snapshot.splits.push(Split::new(expense.id, bob.id, Money::new(covered, Currency::USD)));
        snapshot.expenses.push(expense);
        snapshot
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("Reject".parse::<ImbalancePolicy>().unwrap(), ImbalancePolicy::Reject);
        assert_eq!(" warn".parse::<ImbalancePolicy>().unwrap(), ImbalancePolicy::Warn);
        assert!("ignore".parse::<ImbalancePolicy>().is_err());
    }

    #[test]
    fn test_reject_policy_fails() {
        let (snapshot, _, _) = lopsided_snapshot();
        let options = SettlementOptions::default().with_policy(ImbalancePolicy::Reject);
        let result = compute_group_balances(&snapshot, &options);
        assert!(matches!(
            result,
            Err(SettlementError::Imbalanced { total, .. }) if total == dec!(10)
        ));
        assert!(!result.unwrap_err().is_integrity_violation());
    }

    #[test]
    fn test_imbalance_at_tolerance_is_accepted() {
        let snapshot = short_snapshot(dec!(9.95));
        let reject = SettlementOptions::default().with_policy(ImbalancePolicy::Reject);

        let report = compute_group_balances(&snapshot, &reject).unwrap();
        assert!(report.imbalance.is_none());

        let report = compute_group_balances(&snapshot, &SettlementOptions::default()).unwrap();
        assert!(report.imbalance.is_none());
    }

    #[test]
    fn test_imbalance_past_tolerance_is_flagged() {
        let snapshot = short_snapshot(dec!(9.94));
        let reject = SettlementOptions::default().with_policy(ImbalancePolicy::Reject);

        assert!(matches!(
            compute_group_balances(&snapshot, &reject),
            Err(SettlementError::Imbalanced { total, .. }) if total == dec!(0.06)
        ));

        let report = compute_group_balances(&snapshot, &SettlementOptions::default()).unwrap();
        assert_eq!(report.imbalance.unwrap().total.amount(), dec!(0.06));
    }

    #[test]
    fn test_warn_policy_attaches_imbalance() {
        let (snapshot, alice, bob) = lopsided_snapshot();
        let report = compute_group_balances(&snapshot, &SettlementOptions::default()).unwrap();

        let imbalance = report.imbalance.as_ref().unwrap();
        assert_eq!(imbalance.total.amount(), dec!(10));
        assert_eq!(report.settlements.len(), 1);
        assert_eq!(report.settlements[0].from, bob.id);
        assert_eq!(report.settlements[0].to, alice.id);
        assert_eq!(report.settlements[0].amount.amount(), dec!(45));
    }

    #[test]
    fn test_payment_views() {
        let (snapshot, alice, bob) = lopsided_snapshot();
        let report = compute_group_balances(&snapshot, &SettlementOptions::default()).unwrap();
        assert_eq!(report.payments_from(&bob.id).count(), 1);
        assert_eq!(report.payments_to(&alice.id).count(), 1);
        assert_eq!(report.payments_from(&alice.id).count(), 0);
        assert!(!report.is_settled_up());
    }
}
