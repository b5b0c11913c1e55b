/// Refinancing break-even analysis
///
/// Compares the selected debts as they stand against a single
/// consolidated loan at the offered terms, fees included. Both sides
/// run under the avalanche with the same extra payment so the numbers
/// stay comparable.
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::simulation::simulate;
use crate::types::{Debt, HybridWeights, RefinanceOption, Strategy};

/// Net-savings threshold below which refinancing is not worth the churn
const WORTHWHILE_SAVINGS: Decimal = dec!(500);

/// Break-even horizon in months beyond which the fees take too long
/// to recover
const BREAK_EVEN_LIMIT: u32 = 24;

/// Full read-out of a refinancing offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceAnalysis {
    /// Balance-weighted annual rate of the selected debts
    pub current_weighted_rate: Decimal,
    pub new_rate: Decimal,
    pub baseline_months: u32,
    pub baseline_interest: Decimal,
    pub refinanced_months: u32,
    pub refinanced_interest: Decimal,
    /// Origination fee plus service fees over the refinanced life
    pub total_fees: Decimal,
    pub net_savings: Decimal,
    /// Months until interest savings recover the origination fee,
    /// zero when they never do
    pub break_even_months: u32,
    pub warnings: Vec<String>,
    pub should_refinance: bool,
    pub recommendation: String,
}

/// Analyze a consolidation offer against the current debts.
/// An empty `include_debt_ids` selects every debt.
pub fn analyze_refinance(
    debts: &[Debt],
    option: &RefinanceOption,
    extra_payment: Decimal,
    weights: &HybridWeights,
) -> RefinanceAnalysis {
    let selected: Vec<Debt> = if option.include_debt_ids.is_empty() {
        debts.to_vec()
    } else {
        debts
            .iter()
            .filter(|d| option.include_debt_ids.contains(&d.id))
            .cloned()
            .collect()
    };

    if option.term_months == 0 {
        let mut analysis = empty_analysis(option);
        analysis.warnings = vec!["Refinance term must be at least one month".to_string()];
        analysis.recommendation = "The offered term is invalid.".to_string();
        return analysis;
    }

    let total_balance: Decimal = selected.iter().map(|d| d.balance).sum();
    if total_balance <= Decimal::ZERO {
        return empty_analysis(option);
    }

    let current_weighted_rate =
        selected.iter().map(|d| d.balance * d.interest_rate).sum::<Decimal>() / total_balance;

    let baseline = simulate(Strategy::Avalanche, &selected, extra_payment, weights);

    let consolidated_balance = total_balance + option.origination_fee;
    let consolidated = Debt::new(
        "Consolidated loan",
        consolidated_balance,
        option.new_rate,
        consolidated_balance / Decimal::from(option.term_months),
    );
    let refinanced = simulate(Strategy::Avalanche, &[consolidated], extra_payment, weights);

    let total_fees =
        option.origination_fee + option.monthly_fee * Decimal::from(refinanced.months);
    let net_savings = baseline.total_interest - refinanced.total_interest - total_fees;

    let interest_savings = baseline.total_interest - refinanced.total_interest;
    let break_even_months = if baseline.months > 0 && interest_savings > Decimal::ZERO {
        let monthly_savings = interest_savings / Decimal::from(baseline.months);
        (option.origination_fee / monthly_savings)
            .ceil()
            .to_u32()
            .unwrap_or(0)
    } else {
        0
    };

    let mut warnings = Vec::new();
    if option.new_rate >= current_weighted_rate {
        warnings.push(format!(
            "New rate is not lower than the current weighted rate of {}%",
            (current_weighted_rate * dec!(100)).round_dp(2)
        ));
    }
    if break_even_months > BREAK_EVEN_LIMIT {
        warnings.push(format!(
            "Break-even takes {break_even_months} months, beyond the two-year mark"
        ));
    }
    if refinanced.months > baseline.months {
        warnings.push(format!(
            "Refinancing stretches the payoff from {} to {} months",
            baseline.months, refinanced.months
        ));
    }

    let should_refinance = net_savings > WORTHWHILE_SAVINGS
        && break_even_months < BREAK_EVEN_LIMIT
        && option.new_rate < current_weighted_rate;

    let recommendation = if should_refinance {
        format!(
            "Refinancing saves {} net of fees and breaks even in {break_even_months} months.",
            net_savings.round_dp(2)
        )
    } else if net_savings > Decimal::ZERO {
        format!(
            "Savings of {} are marginal; refinance only if a single payment simplifies your life.",
            net_savings.round_dp(2)
        )
    } else {
        "Fees and the offered rate outweigh any interest saved; keep the current debts.".to_string()
    };

    RefinanceAnalysis {
        current_weighted_rate,
        new_rate: option.new_rate,
        baseline_months: baseline.months,
        baseline_interest: baseline.total_interest,
        refinanced_months: refinanced.months,
        refinanced_interest: refinanced.total_interest,
        total_fees,
        net_savings,
        break_even_months,
        warnings,
        should_refinance,
        recommendation,
    }
}

fn empty_analysis(option: &RefinanceOption) -> RefinanceAnalysis {
    RefinanceAnalysis {
        current_weighted_rate: Decimal::ZERO,
        new_rate: option.new_rate,
        baseline_months: 0,
        baseline_interest: Decimal::ZERO,
        refinanced_months: 0,
        refinanced_interest: Decimal::ZERO,
        total_fees: Decimal::ZERO,
        net_savings: Decimal::ZERO,
        break_even_months: 0,
        warnings: vec!["No debts selected".to_string()],
        should_refinance: false,
        recommendation: "No debts selected for refinancing.".to_string(),
    }
}
