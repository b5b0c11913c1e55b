/// Lump-sum search
///
/// Finds which debt best receives a one-time payment by re-simulating
/// per candidate and comparing total interest against the baseline run.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::simulator::{simulate, SimulationResult};
use crate::types::{Debt, HybridWeights, Strategy};

/// Best target for a one-time payment. `debt_id` is `None` when no
/// candidate yields a positive saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSumOutcome {
    pub debt_id: Option<Uuid>,
    pub interest_saved: Decimal,
}

/// Apply a lump sum to one debt's starting balance, floored at zero,
/// then simulate as usual
pub fn simulate_with_lump_sum(
    strategy: Strategy,
    debts: &[Debt],
    extra_payment: Decimal,
    lump_sum: Decimal,
    target_debt_id: Uuid,
    weights: &HybridWeights,
) -> SimulationResult {
    let adjusted: Vec<Debt> = debts
        .iter()
        .map(|debt| {
            let mut debt = debt.clone();
            if debt.id == target_debt_id {
                debt.balance = (debt.balance - lump_sum).max(Decimal::ZERO);
            }
            debt
        })
        .collect();
    simulate(strategy, &adjusted, extra_payment, weights)
}

/// Try the lump sum against every open debt and keep the candidate
/// with the largest positive interest saving. Ties keep the earlier
/// input position.
pub fn best_lump_sum_target(
    strategy: Strategy,
    debts: &[Debt],
    extra_payment: Decimal,
    lump_sum: Decimal,
    weights: &HybridWeights,
) -> LumpSumOutcome {
    let baseline = simulate(strategy, debts, extra_payment, weights);

    let mut best = LumpSumOutcome {
        debt_id: None,
        interest_saved: Decimal::ZERO,
    };
    for debt in debts.iter().filter(|d| d.balance > Decimal::ZERO) {
        let candidate =
            simulate_with_lump_sum(strategy, debts, extra_payment, lump_sum, debt.id, weights);
        let saved = baseline.total_interest - candidate.total_interest;
        if saved > best.interest_saved {
            best = LumpSumOutcome {
                debt_id: Some(debt.id),
                interest_saved: saved,
            };
        }
    }
    best
}
