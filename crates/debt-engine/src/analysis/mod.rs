/// Analytical overlays on top of the simulator
///
/// What-if projection, refinancing break-even, sensitivity stress
/// testing, and the progress read-outs (milestones, monthly aggregate
/// schedule, psychological score).
pub mod progress;
pub mod refinance;
pub mod sensitivity;
pub mod what_if;

pub use progress::{
    milestones, monthly_schedule, psychological_score, Milestone, MilestoneKind, Momentum,
    MonthlyTotal, PsychologicalScore,
};
pub use refinance::{analyze_refinance, RefinanceAnalysis};
pub use sensitivity::{run_sensitivity, RiskLevel, SensitivityResult};
pub use what_if::{run_what_if, WhatIfResult};
