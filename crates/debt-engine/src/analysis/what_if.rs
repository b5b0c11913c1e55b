/// What-if scenario projection
///
/// Replays the recommended strategy under a hypothetical change and
/// reports the movement against the baseline run. Savings can go
/// negative, an income drop costs months and interest.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::simulation::{best_lump_sum_target, simulate, simulate_with_lump_sum, SimulationResult};
use crate::types::{Debt, HybridWeights, Strategy, WhatIfScenario};

/// Outcome of one what-if scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfResult {
    pub label: String,
    pub months: u32,
    pub total_interest: Decimal,
    /// Months shaved off the baseline; negative when the scenario
    /// lengthens the payoff
    pub months_saved: i64,
    pub interest_saved: Decimal,
    /// Set for lump-sum scenarios: the debt the payment went to
    pub best_lump_sum_target: Option<Uuid>,
    pub description: String,
}

/// Evaluate each scenario against the baseline simulation
pub fn run_what_if(
    scenarios: &[WhatIfScenario],
    debts: &[Debt],
    total_debt_budget: Decimal,
    extra_payment: Decimal,
    strategy: Strategy,
    weights: &HybridWeights,
    baseline: &SimulationResult,
) -> Vec<WhatIfResult> {
    scenarios
        .iter()
        .map(|scenario| evaluate(scenario, debts, total_debt_budget, extra_payment, strategy, weights, baseline))
        .collect()
}

fn evaluate(
    scenario: &WhatIfScenario,
    debts: &[Debt],
    total_debt_budget: Decimal,
    extra_payment: Decimal,
    strategy: Strategy,
    weights: &HybridWeights,
    baseline: &SimulationResult,
) -> WhatIfResult {
    match scenario {
        WhatIfScenario::ExtraMonthly { amount } => {
            let result = simulate(strategy, debts, extra_payment + *amount, weights);
            let description = format!(
                "Paying {amount} more per month finishes in {} months instead of {}.",
                result.months, baseline.months
            );
            build(scenario, &result, baseline, None, description)
        }
        WhatIfScenario::LumpSum { amount, target_debt_id } => {
            let target = target_debt_id.or_else(|| {
                best_lump_sum_target(strategy, debts, extra_payment, *amount, weights).debt_id
            });
            match target {
                Some(debt_id) => {
                    let result = simulate_with_lump_sum(
                        strategy,
                        debts,
                        extra_payment,
                        *amount,
                        debt_id,
                        weights,
                    );
                    let name = debts
                        .iter()
                        .find(|d| d.id == debt_id)
                        .map(|d| d.name.as_str())
                        .unwrap_or("the selected debt");
                    let description = format!(
                        "A one-time {amount} toward '{name}' finishes the plan in {} months.",
                        result.months
                    );
                    build(scenario, &result, baseline, Some(debt_id), description)
                }
                None => build(
                    scenario,
                    baseline,
                    baseline,
                    None,
                    "No debt gains from this lump sum; the plan is unchanged.".to_string(),
                ),
            }
        }
        WhatIfScenario::IncomeChange { amount } => {
            let new_budget = total_debt_budget * (Decimal::ONE + *amount);
            let minimum_total: Decimal = debts.iter().map(|d| d.minimum_payment).sum();
            let new_extra = (new_budget - minimum_total).max(Decimal::ZERO);
            let result = simulate(strategy, debts, new_extra, weights);
            let direction = if amount.is_sign_negative() { "drops" } else { "rises" };
            let description = format!(
                "If the budget {direction} to {}, the payoff takes {} months.",
                new_budget.round_dp(2),
                result.months
            );
            build(scenario, &result, baseline, None, description)
        }
    }
}

fn build(
    scenario: &WhatIfScenario,
    result: &SimulationResult,
    baseline: &SimulationResult,
    best_lump_sum_target: Option<Uuid>,
    description: String,
) -> WhatIfResult {
    WhatIfResult {
        label: scenario.label(),
        months: result.months,
        total_interest: result.total_interest,
        months_saved: baseline.months as i64 - result.months as i64,
        interest_saved: baseline.total_interest - result.total_interest,
        best_lump_sum_target,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fixture() -> (Vec<Debt>, Decimal, Decimal, SimulationResult) {
        let debts = vec![
            Debt::new("Card", dec!(5000), dec!(0.18), dec!(150)),
            Debt::new("Car", dec!(10000), dec!(0.06), dec!(200)),
        ];
        let budget = dec!(550);
        let extra = dec!(200);
        let baseline = simulate(Strategy::Avalanche, &debts, extra, &HybridWeights::default());
        (debts, budget, extra, baseline)
    }

    #[test]
    fn test_extra_monthly_saves_months_and_interest() {
        let (debts, budget, extra, baseline) = fixture();
        let scenarios = vec![WhatIfScenario::ExtraMonthly { amount: dec!(100) }];
        let results = run_what_if(
            &scenarios,
            &debts,
            budget,
            extra,
            Strategy::Avalanche,
            &HybridWeights::default(),
            &baseline,
        );

        assert_eq!(results.len(), 1);
        assert!(results[0].months_saved > 0);
        assert!(results[0].interest_saved > Decimal::ZERO);
        assert!(results[0].label.contains("100"));
    }

    #[test]
    fn test_lump_sum_without_target_picks_best_debt() {
        let (debts, budget, extra, baseline) = fixture();
        let scenarios = vec![WhatIfScenario::LumpSum {
            amount: dec!(3000),
            target_debt_id: None,
        }];
        let results = run_what_if(
            &scenarios,
            &debts,
            budget,
            extra,
            Strategy::Avalanche,
            &HybridWeights::default(),
            &baseline,
        );

        // The 18% card is the best home for the money
        assert_eq!(results[0].best_lump_sum_target, Some(debts[0].id));
        assert!(results[0].interest_saved > Decimal::ZERO);
        assert!(results[0].description.contains("Card"));
    }

    #[test]
    fn test_lump_sum_with_explicit_target() {
        let (debts, budget, extra, baseline) = fixture();
        let scenarios = vec![WhatIfScenario::LumpSum {
            amount: dec!(2000),
            target_debt_id: Some(debts[1].id),
        }];
        let results = run_what_if(
            &scenarios,
            &debts,
            budget,
            extra,
            Strategy::Avalanche,
            &HybridWeights::default(),
            &baseline,
        );

        assert_eq!(results[0].best_lump_sum_target, Some(debts[1].id));
        assert!(results[0].interest_saved > Decimal::ZERO);
    }

    #[test]
    fn test_income_decrease_costs_months() {
        let (debts, budget, extra, baseline) = fixture();
        let scenarios = vec![WhatIfScenario::IncomeChange { amount: dec!(-0.20) }];
        let results = run_what_if(
            &scenarios,
            &debts,
            budget,
            extra,
            Strategy::Avalanche,
            &HybridWeights::default(),
            &baseline,
        );

        // 20% less budget means a longer payoff and more interest
        assert!(results[0].months_saved < 0);
        assert!(results[0].interest_saved < Decimal::ZERO);
    }

    #[test]
    fn test_income_change_floors_extra_at_zero() {
        let (debts, budget, extra, baseline) = fixture();
        // A 50% cut drops the budget below the 350 of minimums
        let scenarios = vec![WhatIfScenario::IncomeChange { amount: dec!(-0.50) }];
        let results = run_what_if(
            &scenarios,
            &debts,
            budget,
            extra,
            Strategy::Avalanche,
            &HybridWeights::default(),
            &baseline,
        );

        // Identical to simulating on minimums alone
        let minimums_only = simulate(Strategy::Avalanche, &debts, Decimal::ZERO, &HybridWeights::default());
        assert_eq!(results[0].months, minimums_only.months);
        assert_eq!(results[0].total_interest, minimums_only.total_interest);
    }
}
