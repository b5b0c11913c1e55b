/// Payment-plan construction
///
/// Converts per-debt timelines into the externally visible payment
/// plans and per-strategy comparison rows. Monthly figures refer to
/// the first month of simulation, not an average, so the per-strategy
/// allocation equals the sum of the plans' monthly payments by
/// construction.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::simulation::{DebtTimeline, SimulationResult};
use crate::types::{Debt, Strategy};

/// Externally visible plan for one debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub debt_id: Uuid,
    pub debt_name: String,
    /// Total paid in the first month of simulation
    pub monthly_payment: Decimal,
    /// First-month payment beyond the debt's own minimum
    pub extra_payment: Decimal,
    pub payoff_month: u32,
    pub total_interest: Decimal,
    pub timeline: DebtTimeline,
}

/// One row of the five-strategy comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub strategy: Strategy,
    pub total_months: u32,
    pub total_interest: Decimal,
    /// Positive when this strategy beats the avalanche baseline
    pub interest_saved_vs_avalanche: Decimal,
    pub first_debt_cleared_month: u32,
    pub description: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub payment_plans: Vec<PaymentPlan>,
    /// Sum of first-month payments across all plans
    pub monthly_allocation: Decimal,
}

/// Build plans for every debt, sorted by payoff month with debts that
/// never clear ordered last
pub fn build_plans(result: &SimulationResult, debts: &[Debt]) -> Vec<PaymentPlan> {
    let mut plans: Vec<PaymentPlan> = debts
        .iter()
        .filter_map(|debt| {
            let timeline = result.timelines.get(&debt.id)?;
            let monthly_payment = timeline
                .snapshots
                .first()
                .map(|s| s.payment)
                .unwrap_or(Decimal::ZERO);
            Some(PaymentPlan {
                debt_id: debt.id,
                debt_name: debt.name.clone(),
                monthly_payment,
                extra_payment: (monthly_payment - debt.minimum_payment).max(Decimal::ZERO),
                payoff_month: timeline.payoff_month,
                total_interest: timeline.total_interest,
                timeline: timeline.clone(),
            })
        })
        .collect();

    plans.sort_by_key(|plan| {
        if plan.payoff_month == 0 {
            u32::MAX
        } else {
            plan.payoff_month
        }
    });
    plans
}

/// Sum of first-month payments, the strategy's monthly allocation
pub fn monthly_allocation(plans: &[PaymentPlan]) -> Decimal {
    plans.iter().map(|p| p.monthly_payment).sum()
}

/// Build a comparison row for one strategy's simulation.
/// `baseline_interest` is the avalanche total used for savings.
pub fn build_comparison(
    result: &SimulationResult,
    debts: &[Debt],
    baseline_interest: Decimal,
) -> StrategyComparison {
    let payment_plans = build_plans(result, debts);
    let allocation = monthly_allocation(&payment_plans);

    StrategyComparison {
        strategy: result.strategy,
        total_months: result.months,
        total_interest: result.total_interest,
        interest_saved_vs_avalanche: baseline_interest - result.total_interest,
        first_debt_cleared_month: result.first_cleared,
        description: describe(result.strategy),
        pros: pros(result.strategy),
        cons: cons(result.strategy),
        payment_plans,
        monthly_allocation: allocation,
    }
}

fn describe(strategy: Strategy) -> String {
    match strategy {
        Strategy::Avalanche => {
            "Pay minimums on everything and send all extra money to the highest interest rate. Mathematically optimal for total interest."
        }
        Strategy::Snowball => {
            "Pay minimums on everything and send all extra money to the smallest balance. Builds momentum through early wins."
        }
        Strategy::CashFlow => {
            "Target the debt whose payoff frees the most monthly cash relative to its balance, loosening a tight budget fastest."
        }
        Strategy::Stress => {
            "Target the debt that weighs on you most, regardless of rate. Peace of mind over optimization."
        }
        Strategy::Hybrid => {
            "Score every debt on rate, size, stress and cash-flow release at once and target the best composite."
        }
    }
    .to_string()
}

fn pros(strategy: Strategy) -> Vec<String> {
    let list: &[&str] = match strategy {
        Strategy::Avalanche => &[
            "Lowest total interest of any order",
            "Often the fastest route to debt-free",
        ],
        Strategy::Snowball => &[
            "Quick early payoffs keep motivation high",
            "Fewer open accounts to track sooner",
        ],
        Strategy::CashFlow => &[
            "Frees up monthly cash the fastest",
            "Builds slack into a stretched budget",
        ],
        Strategy::Stress => &[
            "Directly removes the most stressful obligation",
            "Accounts for relationships and pressure, not just math",
        ],
        Strategy::Hybrid => &[
            "Balances savings, wins and stress in one ranking",
            "Tunable weights adapt to personal priorities",
        ],
    };
    list.iter().map(|s| s.to_string()).collect()
}

fn cons(strategy: Strategy) -> Vec<String> {
    let list: &[&str] = match strategy {
        Strategy::Avalanche => &[
            "The first payoff can be a long wait",
            "Requires discipline without visible wins",
        ],
        Strategy::Snowball => &[
            "Usually pays more interest overall",
            "High-rate debts linger longer",
        ],
        Strategy::CashFlow => &[
            "Not optimized for total interest",
            "Can leave expensive debt for last",
        ],
        Strategy::Stress => &[
            "Can be the most expensive order",
            "Depends on honest stress scoring",
        ],
        Strategy::Hybrid => &[
            "Harder to explain than a single rule",
            "Weight choices change the outcome",
        ],
    };
    list.iter().map(|s| s.to_string()).collect()
}
