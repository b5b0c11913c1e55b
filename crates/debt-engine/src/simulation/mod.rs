/// Month-by-month amortization machinery
///
/// Covers the strategy ordering policy, the tick simulator that plays
/// a debt set forward, and the lump-sum target search built on top of
/// repeated simulation.
pub mod lump_sum;
mod ordering;
pub mod simulator;

pub use lump_sum::{best_lump_sum_target, simulate_with_lump_sum, LumpSumOutcome};
pub use simulator::{
    simulate, DebtTimeline, MonthlySnapshot, SimulationResult, EPSILON, HORIZON_MONTHS,
};
