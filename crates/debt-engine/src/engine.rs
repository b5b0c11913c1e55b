/// Orchestrator for the debt-payoff strategy engine
///
/// The one public operation: validate the input, simulate every
/// strategy, pick the recommendation, derive plans and progress
/// analytics from it, and attach whichever overlays were requested.
/// Pure per invocation; the caller supplies the clock.
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use validator::Validate;

use crate::analysis::{
    analyze_refinance, milestones, monthly_schedule, psychological_score, run_sensitivity,
    run_what_if, Milestone, Momentum, MonthlyTotal, PsychologicalScore, RefinanceAnalysis,
    SensitivityResult, WhatIfResult,
};
use crate::error::{EngineError, Result};
use crate::plan::{build_comparison, build_plans, PaymentPlan, StrategyComparison};
use crate::selector::select;
use crate::simulation::{simulate, SimulationResult, EPSILON, HORIZON_MONTHS};
use crate::types::{Strategy, StrategyInput};

/// Everything a caller gets back from one engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutput {
    pub recommended_strategy: Strategy,
    /// Plans under the recommended strategy, sorted by payoff month
    pub payment_plans: Vec<PaymentPlan>,
    /// Months until debt-free under the recommendation, capped at the
    /// horizon when balances remain
    pub debt_free_month: u32,
    pub total_interest: Decimal,
    pub reasoning: String,
    pub key_facts: Vec<String>,
    /// Soft, non-fatal conditions observed during the run
    pub warnings: Vec<String>,
    pub comparisons: Vec<StrategyComparison>,
    pub monthly_schedule: Vec<MonthlyTotal>,
    pub milestones: Vec<Milestone>,
    pub psychological_score: PsychologicalScore,
    pub what_if_results: Vec<WhatIfResult>,
    pub refinance_analysis: Option<RefinanceAnalysis>,
    pub sensitivity_results: Vec<SensitivityResult>,
}

/// Stateless engine front door. Safe to share and call concurrently;
/// every call works on its own copies.
#[derive(Debug, Default)]
pub struct StrategyEngine;

impl StrategyEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline for one user's debt picture.
    ///
    /// `now` is only used to stamp milestone dates; the engine never
    /// reads the system clock.
    #[instrument(skip(self, input), fields(debts = input.debts.len(), budget = %input.total_debt_budget))]
    pub fn execute(&self, input: &StrategyInput, now: DateTime<Utc>) -> Result<StrategyOutput> {
        if input.debts.is_empty() {
            debug!("no debts supplied, returning the empty plan");
            return Ok(Self::empty_output());
        }

        self.validate(input)?;
        debug!("input validated");

        let weights = input.hybrid_weights.clone().unwrap_or_default();
        let extra_payment = input.extra_payment();
        let debts = &input.debts;

        // The five simulations are embarrassingly parallel; each works
        // on its own balance copies
        let results: Vec<SimulationResult> = Strategy::ALL
            .par_iter()
            .map(|&strategy| simulate(strategy, debts, extra_payment, &weights))
            .collect();
        debug!(avalanche_months = results[0].months, "simulated all strategies");

        let baseline_interest = results[0].total_interest;
        let comparisons: Vec<StrategyComparison> = results
            .iter()
            .map(|result| build_comparison(result, debts, baseline_interest))
            .collect();

        let selection = select(
            debts,
            input.total_debt_budget,
            input.preferred_strategy,
            input.motivation_level,
            &results[0],
            &results[1],
        );
        debug!(strategy = %selection.strategy, "selected recommendation");

        let recommended_index = Strategy::ALL
            .iter()
            .position(|&s| s == selection.strategy)
            .unwrap_or(0);
        let recommended = &results[recommended_index];

        let payment_plans = build_plans(recommended, debts);
        let milestone_events = milestones(recommended, debts, now);
        let schedule = monthly_schedule(recommended, debts);
        let score = psychological_score(recommended);

        let mut key_facts = vec![selection.key_fact];
        let mut warnings = Vec::new();
        if extra_payment <= EPSILON {
            key_facts.push(
                "The budget covers only minimum payments, so every strategy produces the same plan."
                    .to_string(),
            );
            warnings.push("No extra payment is available beyond the minimums".to_string());
        }
        if recommended.months == HORIZON_MONTHS && !recommended.is_debt_free() {
            warnings.push(format!(
                "Repayment horizon of {HORIZON_MONTHS} months reached with balances remaining"
            ));
        }

        let what_if_results = if input.what_if_scenarios.is_empty() {
            Vec::new()
        } else {
            run_what_if(
                &input.what_if_scenarios,
                debts,
                input.total_debt_budget,
                extra_payment,
                selection.strategy,
                &weights,
                recommended,
            )
        };

        let refinance_analysis = input
            .refinance_option
            .as_ref()
            .map(|option| analyze_refinance(debts, option, extra_payment, &weights));

        let sensitivity_results = if input.run_sensitivity {
            let (stress_results, stress_warnings) = run_sensitivity(
                debts,
                input.total_debt_budget,
                selection.strategy,
                &weights,
                recommended,
            );
            warnings.extend(stress_warnings);
            stress_results
        } else {
            Vec::new()
        };

        debug!(
            months = recommended.months,
            overlays = what_if_results.len(),
            "engine run complete"
        );

        Ok(StrategyOutput {
            recommended_strategy: selection.strategy,
            payment_plans,
            debt_free_month: recommended.months,
            total_interest: recommended.total_interest,
            reasoning: selection.reasoning,
            key_facts,
            warnings,
            comparisons,
            monthly_schedule: schedule,
            milestones: milestone_events,
            psychological_score: score,
            what_if_results,
            refinance_analysis,
            sensitivity_results,
        })
    }

    fn validate(&self, input: &StrategyInput) -> Result<()> {
        if input.total_debt_budget <= Decimal::ZERO {
            return Err(EngineError::NonPositiveBudget {
                budget: input.total_debt_budget,
            });
        }

        for debt in &input.debts {
            debt.validate()
                .map_err(|e| EngineError::invalid_debt(&debt.name, e.to_string()))?;
        }

        let required = input.minimum_payment_total();
        if input.total_debt_budget < required {
            return Err(EngineError::BudgetBelowMinimums {
                budget: input.total_debt_budget,
                required,
            });
        }

        if let Some(option) = &input.refinance_option {
            if option.term_months == 0 {
                return Err(EngineError::InvalidRefinanceTerm {
                    term_months: option.term_months,
                });
            }
        }

        Ok(())
    }

    /// The "no debts" shell: not an error, just nothing to plan
    fn empty_output() -> StrategyOutput {
        StrategyOutput {
            recommended_strategy: Strategy::Avalanche,
            payment_plans: Vec::new(),
            debt_free_month: 0,
            total_interest: Decimal::ZERO,
            reasoning: "No debts were provided, so there is nothing to pay off.".to_string(),
            key_facts: vec!["You are already debt-free.".to_string()],
            warnings: Vec::new(),
            comparisons: Vec::new(),
            monthly_schedule: Vec::new(),
            milestones: Vec::new(),
            psychological_score: PsychologicalScore {
                quick_wins: 0,
                first_win_month: 0,
                momentum: Momentum::SlowStart,
                motivation_score: 50,
                celebrations: Vec::new(),
            },
            what_if_results: Vec::new(),
            refinance_analysis: None,
            sensitivity_results: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Debt, RefinanceOption, WhatIfScenario};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn input(debts: Vec<Debt>, budget: Decimal) -> StrategyInput {
        StrategyInput {
            debts,
            total_debt_budget: budget,
            preferred_strategy: None,
            motivation_level: None,
            hybrid_weights: None,
            what_if_scenarios: Vec::new(),
            refinance_option: None,
            run_sensitivity: false,
        }
    }

    fn card_and_car() -> Vec<Debt> {
        vec![
            Debt::new("CC", dec!(5000), dec!(0.18), dec!(150)),
            Debt::new("Car", dec!(10000), dec!(0.06), dec!(200)),
        ]
    }

    #[test]
    fn test_empty_debts_returns_shell_not_error() {
        let output = StrategyEngine::new().execute(&input(Vec::new(), dec!(500)), now()).unwrap();
        assert_eq!(output.recommended_strategy, Strategy::Avalanche);
        assert_eq!(output.debt_free_month, 0);
        assert_eq!(output.total_interest, Decimal::ZERO);
        assert!(output.comparisons.is_empty());
        assert!(output.payment_plans.is_empty());
        assert!(!output.reasoning.is_empty());
    }

    #[test]
    fn test_non_positive_budget_is_rejected() {
        let err = StrategyEngine::new()
            .execute(&input(card_and_car(), Decimal::ZERO), now())
            .unwrap_err();
        assert!(matches!(err, EngineError::NonPositiveBudget { .. }));
    }

    #[test]
    fn test_budget_below_minimums_is_rejected() {
        let err = StrategyEngine::new()
            .execute(&input(card_and_car(), dec!(300)), now())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::BudgetBelowMinimums { required, .. } if required == dec!(350)
        ));
    }

    #[test]
    fn test_invalid_debt_fields_are_rejected() {
        let mut debts = card_and_car();
        debts[0].interest_rate = dec!(1.2);
        let err = StrategyEngine::new().execute(&input(debts, dec!(550)), now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDebt { name, .. } if name == "CC"));
    }

    #[test]
    fn test_zero_refinance_term_is_rejected() {
        let mut request = input(card_and_car(), dec!(550));
        request.refinance_option = Some(RefinanceOption {
            new_rate: dec!(0.05),
            term_months: 0,
            origination_fee: Decimal::ZERO,
            monthly_fee: Decimal::ZERO,
            include_debt_ids: Vec::new(),
        });
        let err = StrategyEngine::new().execute(&request, now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRefinanceTerm { .. }));
    }

    #[test]
    fn test_two_debt_avalanche_clears_card_first() {
        let output = StrategyEngine::new().execute(&input(card_and_car(), dec!(550)), now()).unwrap();

        let avalanche = output
            .comparisons
            .iter()
            .find(|c| c.strategy == Strategy::Avalanche)
            .unwrap();
        let cc = avalanche.payment_plans.iter().find(|p| p.debt_name == "CC").unwrap();
        let car = avalanche.payment_plans.iter().find(|p| p.debt_name == "Car").unwrap();

        assert!(cc.payoff_month > 0);
        assert!(cc.payoff_month < car.payoff_month);
        assert!(avalanche.total_months <= 60);
    }

    #[test]
    fn test_snowball_quick_win_beats_avalanche_first_clear() {
        let mut debts = card_and_car();
        debts.push(Debt::new("Small", dec!(1000), dec!(0.10), dec!(50)));
        let output = StrategyEngine::new().execute(&input(debts.clone(), dec!(600)), now()).unwrap();

        let snowball = output
            .comparisons
            .iter()
            .find(|c| c.strategy == Strategy::Snowball)
            .unwrap();
        let avalanche = output
            .comparisons
            .iter()
            .find(|c| c.strategy == Strategy::Avalanche)
            .unwrap();

        let small = snowball.payment_plans.iter().find(|p| p.debt_name == "Small").unwrap();
        assert_eq!(snowball.first_debt_cleared_month, small.payoff_month);
        assert!(snowball.first_debt_cleared_month < avalanche.first_debt_cleared_month);
    }

    #[test]
    fn test_stress_strategy_clears_the_stressful_debt_first() {
        let debts = vec![
            Debt::new("Family", dec!(5000), dec!(0.05), dec!(100)).with_stress_score(dec!(9)),
            Debt::new("CC", dec!(3000), dec!(0.20), dec!(100)).with_stress_score(dec!(3)),
        ];
        let output = StrategyEngine::new().execute(&input(debts, dec!(400)), now()).unwrap();

        // Rule 2: a large, high-stress debt pulls the recommendation
        // to the stress strategy
        assert!(matches!(
            output.recommended_strategy,
            Strategy::Stress | Strategy::Snowball
        ));
        assert_eq!(output.recommended_strategy, Strategy::Stress);

        // Plans are sorted by payoff, so the family loan comes first
        assert_eq!(output.payment_plans[0].debt_name, "Family");
        assert!(output.payment_plans[0].payoff_month < output.payment_plans[1].payoff_month);
    }

    #[test]
    fn test_budget_equal_to_minimums_collapses_all_strategies() {
        let output = StrategyEngine::new().execute(&input(card_and_car(), dec!(350)), now()).unwrap();

        let first = &output.comparisons[0];
        for row in &output.comparisons[1..] {
            assert_eq!(row.total_months, first.total_months);
            assert_eq!(row.total_interest, first.total_interest);
        }
        assert!(output
            .key_facts
            .iter()
            .any(|f| f.contains("every strategy produces the same plan")));
        assert!(!output.warnings.is_empty());
    }

    #[test]
    fn test_horizon_saturation_is_a_warning_not_an_error() {
        // 24% on 10000 accrues 200 a month against a 150 minimum plus
        // 10 extra, so the balance never amortizes
        let debts = vec![Debt::new("Stuck", dec!(10000), dec!(0.24), dec!(150))];
        let output = StrategyEngine::new().execute(&input(debts, dec!(160)), now()).unwrap();

        assert_eq!(output.debt_free_month, HORIZON_MONTHS);
        assert!(output.warnings.iter().any(|w| w.contains("horizon")));
        assert!(output.milestones.iter().all(|m| m.month <= HORIZON_MONTHS));
    }

    #[test]
    fn test_monthly_allocation_consistency_across_strategies() {
        let mut debts = card_and_car();
        debts.push(Debt::new("Medical", dec!(2000), dec!(0.00), dec!(75)).with_stress_score(dec!(8)));
        let output = StrategyEngine::new().execute(&input(debts, dec!(700)), now()).unwrap();

        for row in &output.comparisons {
            let summed: Decimal = row.payment_plans.iter().map(|p| p.monthly_payment).sum();
            assert_eq!(row.monthly_allocation, summed);
            // First month spends the whole budget while every debt is open
            assert_eq!(summed, dec!(700));
        }
    }

    #[test]
    fn test_overlays_attached_only_when_requested() {
        let mut request = input(card_and_car(), dec!(550));
        let output = StrategyEngine::new().execute(&request, now()).unwrap();
        assert!(output.what_if_results.is_empty());
        assert!(output.refinance_analysis.is_none());
        assert!(output.sensitivity_results.is_empty());

        request.what_if_scenarios = vec![
            WhatIfScenario::ExtraMonthly { amount: dec!(100) },
            WhatIfScenario::LumpSum {
                amount: dec!(3000),
                target_debt_id: None,
            },
        ];
        request.refinance_option = Some(RefinanceOption {
            new_rate: dec!(0.08),
            term_months: 48,
            origination_fee: dec!(500),
            monthly_fee: dec!(10),
            include_debt_ids: Vec::new(),
        });
        request.run_sensitivity = true;

        let output = StrategyEngine::new().execute(&request, now()).unwrap();
        assert_eq!(output.what_if_results.len(), 2);
        assert!(output.refinance_analysis.is_some());
        assert_eq!(output.sensitivity_results.len(), 4);
        // No variable-rate debts, so the stress run leaves a warning
        assert!(output.warnings.iter().any(|w| w.contains("variable-rate")));
    }

    #[test]
    fn test_execution_is_idempotent() {
        let mut request = input(card_and_car(), dec!(550));
        request.run_sensitivity = true;
        request.what_if_scenarios = vec![WhatIfScenario::IncomeChange { amount: dec!(-0.10) }];

        let engine = StrategyEngine::new();
        let first = engine.execute(&request, now()).unwrap();
        let second = engine.execute(&request, now()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_preferred_strategy_is_honored() {
        let mut request = input(card_and_car(), dec!(550));
        request.preferred_strategy = Some(Strategy::Hybrid);
        let output = StrategyEngine::new().execute(&request, now()).unwrap();
        assert_eq!(output.recommended_strategy, Strategy::Hybrid);
    }

    #[test]
    fn test_unknown_strategy_tag_deserializes_to_avalanche() {
        let json = r#"{
            "debts": [{
                "id": "2f1b1561-4183-4bb5-8bcb-27ba6fe2d310",
                "name": "Visa",
                "balance": "5000",
                "interest_rate": "0.18",
                "minimum_payment": "150"
            }],
            "total_debt_budget": "550",
            "preferred_strategy": "pay-whatever-feels-right"
        }"#;
        let parsed: StrategyInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.preferred_strategy, Some(Strategy::Avalanche));
        assert_eq!(parsed.debts[0].balance, dec!(5000));
        assert!(!parsed.run_sensitivity);
    }

    #[test]
    fn test_what_if_scenario_tags_round_trip() {
        let scenario = WhatIfScenario::IncomeChange { amount: dec!(-0.2) };
        let json = serde_json::to_string(&scenario).unwrap();
        assert!(json.contains("income_change"));
        let back: WhatIfScenario = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scenario);
    }
}
