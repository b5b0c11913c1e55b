/// Input records for the debt-payoff strategy engine
///
/// All amounts are exact decimals in a single currency unit; rates are
/// annual decimals in [0, 1]. Every record here is produced and consumed
/// within one engine call, nothing is persisted.
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// A single outstanding debt, immutable during a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub name: String,
    pub balance: Decimal,
    /// Annual rate as a decimal, e.g. 0.18 for 18% APR
    pub interest_rate: Decimal,
    pub minimum_payment: Decimal,
    /// Consumed by sensitivity analysis only
    #[serde(default)]
    pub is_variable_rate: bool,
    /// Psychological urgency on a 0-10 scale
    #[serde(default)]
    pub stress_score: Decimal,
    #[serde(default)]
    pub is_credit_card: bool,
    #[serde(default)]
    pub credit_limit: Option<Decimal>,
    #[serde(default)]
    pub affects_credit_score: bool,
}

/// Largest accepted monetary amount, keeping a 360-month accrual at
/// any legal rate far inside Decimal's range
const MAX_AMOUNT: Decimal = dec!(1_000_000_000);

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

impl Validate for Debt {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.is_empty() {
            errors.add("name", field_error("length", "name must not be empty"));
        }
        if self.balance.is_sign_negative() {
            errors.add("balance", field_error("range", "balance must not be negative"));
        } else if self.balance > MAX_AMOUNT {
            errors.add("balance", field_error("range", "balance exceeds the supported range"));
        }
        if self.interest_rate.is_sign_negative() || self.interest_rate > Decimal::ONE {
            errors.add(
                "interest_rate",
                field_error("range", "interest rate must be within [0, 1]"),
            );
        }
        if self.minimum_payment.is_sign_negative() || self.minimum_payment > MAX_AMOUNT {
            errors.add(
                "minimum_payment",
                field_error("range", "minimum payment must be between 0 and the supported maximum"),
            );
        }
        if self.stress_score.is_sign_negative() || self.stress_score > dec!(10) {
            errors.add(
                "stress_score",
                field_error("range", "stress score must be within [0, 10]"),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Debt {
    /// Create a debt with a fresh id and neutral optional fields
    pub fn new(name: impl Into<String>, balance: Decimal, interest_rate: Decimal, minimum_payment: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance,
            interest_rate,
            minimum_payment,
            is_variable_rate: false,
            stress_score: Decimal::ZERO,
            is_credit_card: false,
            credit_limit: None,
            affects_credit_score: false,
        }
    }

    /// Set the stress score
    pub fn with_stress_score(mut self, score: Decimal) -> Self {
        self.stress_score = score;
        self
    }

    /// Mark the rate as variable for sensitivity analysis
    pub fn with_variable_rate(mut self) -> Self {
        self.is_variable_rate = true;
        self
    }

    /// Simple monthly rate, annual divided by twelve
    pub fn monthly_rate(&self) -> Decimal {
        self.interest_rate / dec!(12)
    }
}

/// Debt payoff strategy options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Extra payment goes to the highest interest rate
    Avalanche,
    /// Extra payment goes to the smallest balance
    Snowball,
    /// Extra payment goes to the highest minimum-to-balance ratio
    CashFlow,
    /// Extra payment goes to the highest stress score
    Stress,
    /// Weighted composite of rate, balance, stress and cash-flow
    Hybrid,
}

impl Strategy {
    /// Every strategy, in the order the orchestrator evaluates them.
    /// Avalanche first: it is the comparison baseline.
    pub const ALL: [Strategy; 5] = [
        Strategy::Avalanche,
        Strategy::Snowball,
        Strategy::CashFlow,
        Strategy::Stress,
        Strategy::Hybrid,
    ];

    /// Parse a wire tag. Unknown tags fall back to Avalanche.
    pub fn from_tag(tag: &str) -> Strategy {
        match tag.to_ascii_lowercase().as_str() {
            "avalanche" => Strategy::Avalanche,
            "snowball" => Strategy::Snowball,
            "cash_flow" | "cashflow" => Strategy::CashFlow,
            "stress" => Strategy::Stress,
            "hybrid" => Strategy::Hybrid,
            _ => Strategy::Avalanche,
        }
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Strategy::from_tag(&tag))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Avalanche => write!(f, "Debt Avalanche"),
            Strategy::Snowball => write!(f, "Debt Snowball"),
            Strategy::CashFlow => write!(f, "Cash-Flow First"),
            Strategy::Stress => write!(f, "Stress Relief"),
            Strategy::Hybrid => write!(f, "Hybrid Score"),
        }
    }
}

/// Self-reported motivation, consumed by the strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationLevel {
    Low,
    Medium,
    High,
}

/// Weights for the hybrid composite score, consumed raw without
/// renormalization so their magnitudes drive the ordering directly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    pub interest_rate: Decimal,
    pub balance: Decimal,
    pub stress: Decimal,
    pub cash_flow: Decimal,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            interest_rate: dec!(0.4),
            balance: dec!(0.3),
            stress: dec!(0.2),
            cash_flow: dec!(0.1),
        }
    }
}

/// A what-if projection request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WhatIfScenario {
    /// Add a fixed amount to the monthly extra payment
    ExtraMonthly { amount: Decimal },
    /// Apply a one-time payment, optionally to a specific debt
    LumpSum {
        amount: Decimal,
        #[serde(default)]
        target_debt_id: Option<Uuid>,
    },
    /// Scale the monthly budget by a fractional delta, e.g. -0.20
    /// for a 20% income decrease
    IncomeChange { amount: Decimal },
}

impl WhatIfScenario {
    /// Short human-readable label for result rows
    pub fn label(&self) -> String {
        match self {
            WhatIfScenario::ExtraMonthly { amount } => format!("Extra {amount} per month"),
            WhatIfScenario::LumpSum { amount, .. } => format!("Lump sum of {amount}"),
            WhatIfScenario::IncomeChange { amount } => {
                format!("Income change of {}%", (*amount * dec!(100)).round_dp(1))
            }
        }
    }
}

/// Terms of a consolidation loan offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceOption {
    /// Annual rate of the new loan as a decimal
    pub new_rate: Decimal,
    pub term_months: u32,
    pub origination_fee: Decimal,
    pub monthly_fee: Decimal,
    /// Debts to consolidate. Empty means all of them.
    #[serde(default)]
    pub include_debt_ids: Vec<Uuid>,
}

/// Everything one engine call needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInput {
    pub debts: Vec<Debt>,
    pub total_debt_budget: Decimal,
    #[serde(default)]
    pub preferred_strategy: Option<Strategy>,
    #[serde(default)]
    pub motivation_level: Option<MotivationLevel>,
    #[serde(default)]
    pub hybrid_weights: Option<HybridWeights>,
    #[serde(default)]
    pub what_if_scenarios: Vec<WhatIfScenario>,
    #[serde(default)]
    pub refinance_option: Option<RefinanceOption>,
    #[serde(default)]
    pub run_sensitivity: bool,
}

impl StrategyInput {
    /// Sum of all minimum payments
    pub fn minimum_payment_total(&self) -> Decimal {
        self.debts.iter().map(|d| d.minimum_payment).sum()
    }

    /// Monthly budget left over after minimum payments, floored at zero
    pub fn extra_payment(&self) -> Decimal {
        (self.total_debt_budget - self.minimum_payment_total()).max(Decimal::ZERO)
    }
}
