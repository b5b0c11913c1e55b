/// Ordering policy: which debt receives extra payment first
///
/// Ranks the current debt list by the strategy's criterion and returns
/// indices in priority order. Sorts are stable, so ties keep the
/// original input order. Balances are passed separately because the
/// simulator re-ranks every month as they shrink.
use rust_decimal::Decimal;

use crate::types::{Debt, HybridWeights, Strategy};

/// Indices of `debts` sorted by priority for receiving extra payment
pub(crate) fn priority_order(
    strategy: Strategy,
    debts: &[Debt],
    balances: &[Decimal],
    weights: &HybridWeights,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..debts.len()).collect();

    match strategy {
        Strategy::Avalanche => {
            order.sort_by(|&a, &b| debts[b].interest_rate.cmp(&debts[a].interest_rate));
        }
        Strategy::Snowball => {
            // Cleared debts sort last; they are skipped during allocation
            let key = |i: usize| {
                if balances[i] <= Decimal::ZERO {
                    Decimal::MAX
                } else {
                    balances[i]
                }
            };
            order.sort_by(|&a, &b| key(a).cmp(&key(b)));
        }
        Strategy::CashFlow => {
            let ratios = cash_flow_ratios(debts, balances);
            order.sort_by(|&a, &b| ratios[b].cmp(&ratios[a]));
        }
        Strategy::Stress => {
            order.sort_by(|&a, &b| debts[b].stress_score.cmp(&debts[a].stress_score));
        }
        Strategy::Hybrid => {
            let scores = hybrid_scores(debts, balances, weights);
            order.sort_by(|&a, &b| scores[b].cmp(&scores[a]));
        }
    }

    order
}

/// Minimum payment over current balance, zero for cleared debts
fn cash_flow_ratios(debts: &[Debt], balances: &[Decimal]) -> Vec<Decimal> {
    debts
        .iter()
        .zip(balances)
        .map(|(debt, balance)| {
            if balance.is_zero() || *balance < Decimal::ZERO {
                Decimal::ZERO
            } else {
                debt.minimum_payment / *balance
            }
        })
        .collect()
}

/// Weighted composite score per debt.
///
/// Each component is max-normalized into [0, 1] over the current list;
/// a zero maximum yields a zero component. Smaller balances score
/// higher, so the balance component is inverted.
fn hybrid_scores(debts: &[Debt], balances: &[Decimal], weights: &HybridWeights) -> Vec<Decimal> {
    let max_rate = debts.iter().map(|d| d.interest_rate).max().unwrap_or(Decimal::ZERO);
    let max_balance = balances.iter().copied().max().unwrap_or(Decimal::ZERO);
    let max_stress = debts.iter().map(|d| d.stress_score).max().unwrap_or(Decimal::ZERO);
    let ratios = cash_flow_ratios(debts, balances);
    let max_ratio = ratios.iter().copied().max().unwrap_or(Decimal::ZERO);

    let normalized = |value: Decimal, max: Decimal| {
        if max.is_zero() {
            Decimal::ZERO
        } else {
            value / max
        }
    };

    debts
        .iter()
        .enumerate()
        .map(|(i, debt)| {
            let rate_component = normalized(debt.interest_rate, max_rate);
            let balance_component = if max_balance.is_zero() {
                Decimal::ZERO
            } else {
                Decimal::ONE - balances[i] / max_balance
            };
            let stress_component = normalized(debt.stress_score, max_stress);
            let cash_flow_component = normalized(ratios[i], max_ratio);

            weights.interest_rate * rate_component
                + weights.balance * balance_component
                + weights.stress * stress_component
                + weights.cash_flow * cash_flow_component
        })
        .collect()
}
