/// Sensitivity (stress) analysis
///
/// Replays the recommended strategy under four fixed shocks: income
/// down 10% and 20%, variable rates up 2 and 5 points. Income shocks
/// re-derive the extra payment from the reduced budget; rate shocks
/// touch only debts flagged as variable-rate.
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::simulation::{simulate, SimulationResult};
use crate::types::{Debt, HybridWeights, Strategy};

/// How hard a shock hits the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// One stress scenario's impact on the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub scenario: String,
    /// Extra months versus the baseline
    pub months_delta: i64,
    /// Extra interest versus the baseline
    pub interest_delta: Decimal,
    pub risk_level: RiskLevel,
    /// False when the shock calls the current strategy into question
    pub strategy_still_valid: bool,
    pub new_recommendation: Option<Strategy>,
}

enum Shock {
    IncomeDecrease(Decimal),
    VariableRateIncrease(Decimal),
}

/// Run the four fixed shocks. Returns the results plus any soft
/// warnings (no variable-rate debts to stress).
pub fn run_sensitivity(
    debts: &[Debt],
    total_debt_budget: Decimal,
    strategy: Strategy,
    weights: &HybridWeights,
    baseline: &SimulationResult,
) -> (Vec<SensitivityResult>, Vec<String>) {
    let shocks = [
        ("Income decrease 10%", Shock::IncomeDecrease(dec!(0.10))),
        ("Income decrease 20%", Shock::IncomeDecrease(dec!(0.20))),
        ("Variable rate +2%", Shock::VariableRateIncrease(dec!(0.02))),
        ("Variable rate +5%", Shock::VariableRateIncrease(dec!(0.05))),
    ];

    let minimum_total: Decimal = debts.iter().map(|d| d.minimum_payment).sum();
    let current_extra = (total_debt_budget - minimum_total).max(Decimal::ZERO);

    let results = shocks
        .iter()
        .map(|(name, shock)| {
            let result = match shock {
                Shock::IncomeDecrease(cut) => {
                    let new_budget = total_debt_budget * (Decimal::ONE - *cut);
                    let new_extra = (new_budget - minimum_total).max(Decimal::ZERO);
                    simulate(strategy, debts, new_extra, weights)
                }
                Shock::VariableRateIncrease(delta) => {
                    let shocked: Vec<Debt> = debts
                        .iter()
                        .map(|d| {
                            let mut d = d.clone();
                            if d.is_variable_rate {
                                d.interest_rate += *delta;
                            }
                            d
                        })
                        .collect();
                    simulate(strategy, &shocked, current_extra, weights)
                }
            };

            let months_delta = result.months as i64 - baseline.months as i64;
            let interest_delta = result.total_interest - baseline.total_interest;

            let risk_level = if months_delta > 12 || interest_delta > dec!(1000) {
                RiskLevel::High
            } else if months_delta > 6 || interest_delta > dec!(500) {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            };

            // A deep income cut is a cash-flow problem before it is an
            // interest problem
            let questions_strategy = matches!(shock, Shock::IncomeDecrease(cut) if *cut >= dec!(0.20))
                && strategy != Strategy::CashFlow;

            SensitivityResult {
                scenario: name.to_string(),
                months_delta,
                interest_delta,
                risk_level,
                strategy_still_valid: !questions_strategy,
                new_recommendation: questions_strategy.then_some(Strategy::CashFlow),
            }
        })
        .collect();

    let mut warnings = Vec::new();
    if !debts.iter().any(|d| d.is_variable_rate) {
        warnings.push(
            "No variable-rate debts; the rate-increase scenarios have no effect".to_string(),
        );
    }

    (results, warnings)
}
