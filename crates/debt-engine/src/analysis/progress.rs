/// Progress analytics over a finished simulation
///
/// Milestone events, the month-by-month aggregate schedule, and the
/// gamified psychological score all read the recommended strategy's
/// timelines; nothing here re-simulates.
use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::simulation::{SimulationResult, EPSILON};
use crate::types::Debt;

/// What a milestone marks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MilestoneKind {
    DebtCleared { debt_id: Uuid, debt_name: String },
    Halfway,
    DebtFree,
}

/// A notable point on the payoff journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub kind: MilestoneKind,
    /// Months from the start of the plan
    pub month: u32,
    pub date: DateTime<Utc>,
    pub description: String,
}

/// Aggregate cash movement for one month across all debts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub payment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub remaining_debts: u32,
    pub debts_cleared: u32,
}

/// How quickly the plan produces its first win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    FastStart,
    Steady,
    SlowStart,
}

/// Gamified read on how motivating the plan will feel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychologicalScore {
    /// Debts cleared within the first six months
    pub quick_wins: u32,
    /// Month of the first payoff, zero if none
    pub first_win_month: u32,
    pub momentum: Momentum,
    /// 0-100
    pub motivation_score: u32,
    pub celebrations: Vec<String>,
}

/// Milestones for every cleared debt plus the halfway and debt-free
/// markers, stamped with calendar dates offset from `now`
pub fn milestones(result: &SimulationResult, debts: &[Debt], now: DateTime<Utc>) -> Vec<Milestone> {
    let mut events = Vec::new();

    for debt in debts {
        let Some(timeline) = result.timelines.get(&debt.id) else {
            continue;
        };
        if timeline.payoff_month > 0 {
            events.push(Milestone {
                kind: MilestoneKind::DebtCleared {
                    debt_id: debt.id,
                    debt_name: debt.name.clone(),
                },
                month: timeline.payoff_month,
                date: date_at(now, timeline.payoff_month),
                description: format!("'{}' is paid off", debt.name),
            });
        }
    }

    let halfway = result.months / 2;
    if halfway > 0 {
        events.push(Milestone {
            kind: MilestoneKind::Halfway,
            month: halfway,
            date: date_at(now, halfway),
            description: "Halfway through the payoff plan".to_string(),
        });
    }

    if result.months > 0 && result.is_debt_free() {
        events.push(Milestone {
            kind: MilestoneKind::DebtFree,
            month: result.months,
            date: date_at(now, result.months),
            description: format!("Completely debt-free after {} months", result.months),
        });
    }

    events.sort_by_key(|m| m.month);
    events
}

fn date_at(now: DateTime<Utc>, month: u32) -> DateTime<Utc> {
    now.checked_add_months(Months::new(month)).unwrap_or(now)
}

/// Sum payments, interest and principal across every timeline, month
/// by month, with running counts of open and cleared debts
pub fn monthly_schedule(result: &SimulationResult, debts: &[Debt]) -> Vec<MonthlyTotal> {
    (1..=result.months)
        .map(|month| {
            let mut payment = Decimal::ZERO;
            let mut interest = Decimal::ZERO;
            let mut remaining = 0u32;
            let mut cleared = 0u32;

            for debt in debts {
                let Some(timeline) = result.timelines.get(&debt.id) else {
                    continue;
                };
                if let Some(snapshot) = timeline.snapshot_at(month) {
                    payment += snapshot.payment;
                    interest += snapshot.interest;
                    if snapshot.end_balance > EPSILON {
                        remaining += 1;
                    }
                }
                if timeline.payoff_month > 0 && timeline.payoff_month <= month {
                    cleared += 1;
                }
            }

            MonthlyTotal {
                month,
                payment,
                interest,
                principal: payment - interest,
                remaining_debts: remaining,
                debts_cleared: cleared,
            }
        })
        .collect()
}

/// Score the plan's motivational shape
pub fn psychological_score(result: &SimulationResult) -> PsychologicalScore {
    let payoffs: Vec<u32> = result
        .timelines
        .values()
        .filter(|t| t.payoff_month > 0)
        .map(|t| t.payoff_month)
        .collect();

    let quick_wins = payoffs.iter().filter(|&&m| m <= 6).count() as u32;
    let first_win_month = payoffs.iter().copied().min().unwrap_or(0);

    let momentum = match first_win_month {
        1..=3 => Momentum::FastStart,
        4..=6 => Momentum::Steady,
        _ => Momentum::SlowStart,
    };

    let mut score: i64 = 50;
    score += 10 * quick_wins as i64;
    if result.months <= 12 {
        score += 20;
    } else if result.months <= 24 {
        score += 10;
    } else if result.months > 60 {
        score -= 10;
    }
    if first_win_month > 0 {
        if first_win_month <= 3 {
            score += 15;
        } else if first_win_month <= 6 {
            score += 10;
        }
    }
    let motivation_score = score.clamp(0, 100) as u32;

    let mut celebrations = Vec::new();
    match momentum {
        Momentum::FastStart => celebrations.push(format!(
            "First debt gone by month {first_win_month}. That is a fast start!"
        )),
        Momentum::Steady => celebrations.push(format!(
            "First payoff lands in month {first_win_month}, keeping the plan tangible."
        )),
        Momentum::SlowStart => {}
    }
    if quick_wins > 1 {
        celebrations.push(format!("{quick_wins} debts cleared within the first six months."));
    }
    if result.months > 0 && result.is_debt_free() {
        celebrations.push(format!("Completely debt-free in {} months.", result.months));
    }

    PsychologicalScore {
        quick_wins,
        first_win_month,
        momentum,
        motivation_score,
        celebrations,
    }
}
