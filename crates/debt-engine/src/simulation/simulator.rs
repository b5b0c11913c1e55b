/// Amortization simulator
///
/// Plays the debt set forward one month at a time until every balance
/// is cleared or the horizon is reached. Each month follows a fixed
/// order of operations that is observable through the snapshots:
/// accrue interest, pay minimums, allocate extra by strategy order,
/// close the snapshots.
use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ordering::priority_order;
use crate::types::{Debt, HybridWeights, Strategy};

/// Balances below this threshold count as cleared
pub const EPSILON: Decimal = dec!(0.01);

/// Simulation cap. Reaching it with balances remaining is a terminal
/// condition, not an error.
pub const HORIZON_MONTHS: u32 = 360;

/// One debt's state over one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySnapshot {
    pub month: u32,
    pub start_balance: Decimal,
    pub interest: Decimal,
    pub payment: Decimal,
    pub end_balance: Decimal,
}

/// Month-by-month history for a single debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtTimeline {
    pub debt_id: Uuid,
    pub debt_name: String,
    pub snapshots: Vec<MonthlySnapshot>,
    /// First month the balance fell below the clearing threshold,
    /// zero if it never did
    pub payoff_month: u32,
    pub total_interest: Decimal,
    pub total_principal: Decimal,
}

impl DebtTimeline {
    fn new(debt: &Debt) -> Self {
        Self {
            debt_id: debt.id,
            debt_name: debt.name.clone(),
            snapshots: Vec::new(),
            payoff_month: 0,
            total_interest: Decimal::ZERO,
            total_principal: Decimal::ZERO,
        }
    }

    /// Snapshot for a given month, if the debt was still open then.
    /// Snapshots are contiguous from month one, so this is a direct index.
    pub fn snapshot_at(&self, month: u32) -> Option<&MonthlySnapshot> {
        if month == 0 {
            return None;
        }
        self.snapshots.get(month as usize - 1)
    }

    /// Balance left when the simulation stopped
    pub fn final_balance(&self) -> Decimal {
        self.snapshots.last().map(|s| s.end_balance).unwrap_or(Decimal::ZERO)
    }
}

/// Outcome of simulating one strategy over the full debt set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub strategy: Strategy,
    pub months: u32,
    pub total_interest: Decimal,
    pub timelines: HashMap<Uuid, DebtTimeline>,
    /// Earliest payoff month across all debts, zero if none cleared
    pub first_cleared: u32,
}

impl SimulationResult {
    /// True when every debt that started open was cleared in time
    pub fn is_debt_free(&self) -> bool {
        self.timelines
            .values()
            .all(|t| t.snapshots.is_empty() || t.payoff_month > 0)
    }
}

/// Simulate a strategy against the debt set.
///
/// The caller's debts are never mutated; balances are copied at entry.
/// `extra_payment` is the monthly budget beyond the minimum payments
/// and is allocated in the strategy's priority order, re-ranked each
/// month as balances shrink.
pub fn simulate(
    strategy: Strategy,
    debts: &[Debt],
    extra_payment: Decimal,
    weights: &HybridWeights,
) -> SimulationResult {
    let mut balances: Vec<Decimal> = debts.iter().map(|d| d.balance).collect();
    let mut timelines: Vec<DebtTimeline> = debts.iter().map(DebtTimeline::new).collect();

    let mut months = 0u32;
    let mut first_cleared = 0u32;
    let mut total_interest = Decimal::ZERO;

    while months < HORIZON_MONTHS && balances.iter().any(|b| *b > Decimal::ZERO) {
        months += 1;
        let month = months;

        // 1. Record start balances and accrue one month of interest
        for (i, debt) in debts.iter().enumerate() {
            if balances[i] > Decimal::ZERO {
                let start_balance = balances[i];
                let interest = start_balance * debt.monthly_rate();
                balances[i] += interest;
                total_interest += interest;
                timelines[i].snapshots.push(MonthlySnapshot {
                    month,
                    start_balance,
                    interest,
                    payment: Decimal::ZERO,
                    end_balance: Decimal::ZERO,
                });
            }
        }

        // 2. Minimum payments, capped at the post-accrual balance
        for (i, debt) in debts.iter().enumerate() {
            if balances[i] > Decimal::ZERO {
                let due = debt.minimum_payment.min(balances[i]);
                balances[i] -= due;
                if let Some(snapshot) = timelines[i].snapshots.last_mut() {
                    snapshot.payment += due;
                }
            }
        }

        // 3. Extra allocation in strategy priority order
        let mut remaining_extra = extra_payment;
        if remaining_extra > Decimal::ZERO {
            let order = priority_order(strategy, debts, &balances, weights);
            for i in order {
                if remaining_extra <= Decimal::ZERO {
                    break;
                }
                if balances[i] > Decimal::ZERO {
                    let applied = remaining_extra.min(balances[i]);
                    balances[i] -= applied;
                    remaining_extra -= applied;
                    if let Some(snapshot) = timelines[i].snapshots.last_mut() {
                        snapshot.payment += applied;
                    }
                }
            }
        }

        // 4. Close the month's snapshots and record payoffs
        for (i, timeline) in timelines.iter_mut().enumerate() {
            let Some(snapshot) = timeline.snapshots.last_mut() else {
                continue;
            };
            if snapshot.month != month {
                continue;
            }
            let mut end_balance = balances[i].max(Decimal::ZERO);
            if end_balance < EPSILON {
                end_balance = Decimal::ZERO;
            }
            balances[i] = end_balance;
            snapshot.end_balance = end_balance;

            if end_balance.is_zero() && timeline.payoff_month == 0 {
                timeline.payoff_month = month;
                if first_cleared == 0 {
                    first_cleared = month;
                }
            }
        }
    }

    for timeline in &mut timelines {
        timeline.total_interest = timeline.snapshots.iter().map(|s| s.interest).sum();
        let total_paid: Decimal = timeline.snapshots.iter().map(|s| s.payment).sum();
        timeline.total_principal = total_paid - timeline.total_interest;
    }

    SimulationResult {
        strategy,
        months,
        total_interest,
        timelines: timelines.into_iter().map(|t| (t.debt_id, t)).collect(),
        first_cleared,
    }
}
