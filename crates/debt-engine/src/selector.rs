/// Rule-based strategy selection
///
/// Rules are evaluated top-down and the first match wins. Every rule
/// records the fact that triggered it and a sentence of reasoning so
/// the recommendation can be explained back to the user.
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::simulation::SimulationResult;
use crate::types::{Debt, MotivationLevel, Strategy};

/// A chosen strategy together with the rule's explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub strategy: Strategy,
    pub key_fact: String,
    pub reasoning: String,
}

impl Selection {
    fn new(strategy: Strategy, key_fact: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            strategy,
            key_fact: key_fact.into(),
            reasoning: reasoning.into(),
        }
    }
}

/// Pick the recommended strategy from the user's inputs and the
/// avalanche/snowball simulation results
pub fn select(
    debts: &[Debt],
    total_debt_budget: Decimal,
    preferred: Option<Strategy>,
    motivation: Option<MotivationLevel>,
    avalanche: &SimulationResult,
    snowball: &SimulationResult,
) -> Selection {
    // 1. An explicit preference always wins
    if let Some(strategy) = preferred {
        return Selection::new(
            strategy,
            format!("Preferred strategy: {strategy}"),
            format!("{strategy} was requested explicitly, so it is used as-is."),
        );
    }

    let total_debt: Decimal = debts.iter().map(|d| d.balance).sum();

    // 2. A high-stress debt overrides the math
    if let Some(stressed) = debts
        .iter()
        .filter(|d| d.stress_score >= dec!(7))
        .max_by_key(|d| d.stress_score)
    {
        let fact = format!(
            "'{}' carries a stress score of {}",
            stressed.name, stressed.stress_score
        );
        return if stressed.balance < total_debt * dec!(0.2) {
            Selection::new(
                Strategy::Snowball,
                fact,
                "The most stressful debt is also one of the smallest; the snowball clears it quickly and removes the pressure.",
            )
        } else {
            Selection::new(
                Strategy::Stress,
                fact,
                "A large debt is causing significant stress; targeting it directly matters more than the interest math.",
            )
        };
    }

    // 3. Low motivation pairs with an easy first win
    let smallest_open = debts
        .iter()
        .filter(|d| d.balance > Decimal::ZERO)
        .map(|d| d.balance)
        .min();
    if motivation == Some(MotivationLevel::Low) {
        if let Some(smallest) = smallest_open {
            if smallest < dec!(2000) {
                return Selection::new(
                    Strategy::Snowball,
                    format!("Smallest balance is {smallest}"),
                    "With motivation running low, an early win on the smallest debt builds momentum that an optimal plan cannot.",
                );
            }
        }
    }

    let max_rate = debts.iter().map(|d| d.interest_rate).max().unwrap_or(Decimal::ZERO);
    let weighted_avg_rate = if total_debt.is_zero() {
        Decimal::ZERO
    } else {
        debts.iter().map(|d| d.balance * d.interest_rate).sum::<Decimal>() / total_debt
    };

    // 4. One rate far above the portfolio average
    if max_rate - weighted_avg_rate > dec!(0.10) {
        return Selection::new(
            Strategy::Avalanche,
            format!(
                "Top rate {}% sits {} points above the weighted average",
                percent(max_rate),
                percent(max_rate - weighted_avg_rate)
            ),
            "One debt is dramatically more expensive than the rest; the avalanche attacks it first and saves the most interest.",
        );
    }

    // 5. Any rate in credit-card territory
    if max_rate > dec!(0.18) {
        return Selection::new(
            Strategy::Avalanche,
            format!("Highest rate is {}%", percent(max_rate)),
            "Rates above 18% compound painfully fast; paying the most expensive debt first is the priority.",
        );
    }

    // 6. Minimums are eating most of the budget
    let minimum_total: Decimal = debts.iter().map(|d| d.minimum_payment).sum();
    if !total_debt_budget.is_zero() && minimum_total / total_debt_budget > dec!(0.70) {
        return Selection::new(
            Strategy::CashFlow,
            format!(
                "Minimum payments consume {}% of the budget",
                percent(minimum_total / total_debt_budget)
            ),
            "Most of the budget is locked into minimums; freeing monthly cash flow first creates room to maneuver.",
        );
    }

    // 7./8. Compare the two classic strategies head to head
    let interest_gap = snowball.total_interest - avalanche.total_interest;
    if interest_gap > dec!(500) {
        return Selection::new(
            Strategy::Avalanche,
            format!("Avalanche saves {} over snowball", interest_gap.round_dp(2)),
            "The interest savings are substantial, so the mathematically optimal order is worth the wait for the first win.",
        );
    }

    let months_gap = avalanche.months as i64 - snowball.months as i64;
    if months_gap < 3 && interest_gap < dec!(200) {
        return Selection::new(
            Strategy::Snowball,
            format!(
                "Strategies differ by {} in interest and {months_gap} months",
                interest_gap.round_dp(2)
            ),
            "The strategies are nearly identical on cost, so the snowball's motivational quick wins tip the balance.",
        );
    }

    // 9. Default to the mathematical optimum
    Selection::new(
        Strategy::Avalanche,
        "No special condition applies".to_string(),
        "Without a stress, motivation or cash-flow signal, the avalanche minimizes total interest paid.",
    )
}

fn percent(rate: Decimal) -> Decimal {
    (rate * dec!(100)).round_dp(1)
}
