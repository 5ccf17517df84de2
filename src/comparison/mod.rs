//! Ownership comparison: cost of buying versus renting over time

mod engine;
mod market;
mod result;

pub use engine::{compare_ownership_to_renting, horizon_months, DEFAULT_HORIZON_MONTHS};
pub use market::MarketAssumptions;
pub use result::{Breakeven, ComparisonResult, ComparisonRow, ComparisonSummary};
