/// Debt-Payoff Strategy Engine
///
/// A pure computational core for debt-payoff planning: simulates
/// month-by-month amortization under five allocation strategies,
/// compares them, picks a recommendation through an explainable rule
/// set, and layers what-if, refinancing and sensitivity analyses on
/// top. Exact decimal arithmetic throughout via rust_decimal; no I/O,
/// no shared state, the caller supplies the clock.
pub mod analysis;
pub mod engine;
pub mod error;
pub mod plan;
pub mod selector;
pub mod simulation;
pub mod types;

// Re-export the public surface
pub use engine::{StrategyEngine, StrategyOutput};
pub use error::{EngineError, ErrorCategory, Result};

pub use analysis::*;
pub use plan::*;
pub use selector::*;
pub use simulation::*;
pub use types::*;
