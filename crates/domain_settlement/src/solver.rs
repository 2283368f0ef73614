//! Greedy settlement solver
//!
//! Pairs the largest remaining creditor with the largest remaining debtor
//! until one side runs out. Each step clears at least one of the two, so a
//! group with `n` unsettled members gets at most `n - 1` transfers.
//!
//! The result is not always the fewest transfers possible; finding that is
//! a min-cost-flow problem and not worth it for household-sized groups.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use core_kernel::{Currency, MemberId, Money, EPSILON};

use crate::balance::NetBalance;

/// A suggested payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

/// Produces transfers that bring every balance within epsilon of zero
#[derive(Debug, Clone, Copy)]
pub struct SettlementSolver {
    epsilon: Decimal,
}

impl Default for SettlementSolver {
    fn default() -> Self {
        Self { epsilon: EPSILON }
    }
}

impl SettlementSolver {
    pub fn new(epsilon: Decimal) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> Decimal {
        self.epsilon
    }

    /// Computes the settlement list for a set of balances
    ///
    /// Members within epsilon of zero are left out. Creditors are taken
    /// largest first and debtors most-negative first; ties keep the input
    /// order, so the same balances always produce the same list. A transfer
    /// whose rounded amount is not above epsilon is applied but not emitted.
    pub fn solve(&self, balances: &[NetBalance]) -> Vec<Settlement> {
        let Some(currency) = balances.first().map(|b| b.balance.currency()) else {
            return Vec::new();
        };

        let mut creditors: Vec<(MemberId, Decimal)> = balances
            .iter()
            .filter(|b| b.is_creditor(self.epsilon))
            .map(|b| (b.member_id, b.balance.amount()))
            .collect();
        let mut debtors: Vec<(MemberId, Decimal)> = balances
            .iter()
            .filter(|b| b.is_debtor(self.epsilon))
            .map(|b| (b.member_id, b.balance.amount()))
            .collect();

        // sort_by is stable
        creditors.sort_by(|a, b| b.1.cmp(&a.1));
        debtors.sort_by(|a, b| a.1.cmp(&b.1));

        let mut settlements = Vec::with_capacity(creditors.len() + debtors.len());
        let (mut i, mut j) = (0, 0);

        while i < creditors.len() && j < debtors.len() {
            let (creditor, credit) = creditors[i];
            let (debtor, debt) = debtors[j];

            let transfer = credit.min(-debt);
            let rounded = round_minor(transfer, currency);
            if rounded > self.epsilon {
                settlements.push(Settlement {
                    from: debtor,
                    to: creditor,
                    amount: Money::new(rounded, currency),
                });
            } else {
                debug!(%debtor, %creditor, %transfer, "negligible transfer skipped");
            }

            creditors[i].1 -= transfer;
            debtors[j].1 += transfer;

            if creditors[i].1 <= self.epsilon {
                i += 1;
            }
            if debtors[j].1 >= -self.epsilon {
                j += 1;
            }
        }

        settlements
    }
}

/// Applies settlements to balances and returns what is left per member
///
/// The debtor's balance rises by each amount and the creditor's falls by
/// it. For balances that net to zero, every member the sweep reaches ends
/// within epsilon of zero. Members that started inside epsilon are never
/// paid, so a debtor can be left holding their few cents between them.
pub fn residual_balances(balances: &[NetBalance], settlements: &[Settlement]) -> Vec<(MemberId, Decimal)> {
    let mut residual: Vec<(MemberId, Decimal)> = balances
        .iter()
        .map(|b| (b.member_id, b.balance.amount()))
        .collect();
    let index: HashMap<MemberId, usize> = residual
        .iter()
        .enumerate()
        .map(|(i, (id, _))| (*id, i))
        .collect();

    for settlement in settlements {
        if let Some(&from) = index.get(&settlement.from) {
            residual[from].1 += settlement.amount.amount();
        }
        if let Some(&to) = index.get(&settlement.to) {
            residual[to].1 -= settlement.amount.amount();
        }
    }
    residual
}

fn round_minor(amount: Decimal, currency: Currency) -> Decimal {
    amount.round_dp_with_strategy(currency.decimal_places(), RoundingStrategy::MidpointAwayFromZero)
}
