//! Home Ownership - loan amortization and buy-versus-rent breakeven model
//!
//! This library provides:
//! - Constant-payment amortization schedules for fixed-rate loans
//! - Cumulative cost of renting versus buying-then-selling, with the
//!   opportunity cost of invested capital and property appreciation
//! - The breakeven month from which owning beats renting
//! - Parallel parameter sweeps (loan duration, rent level)
//! - JSON configuration and CSV/JSON reporting

pub mod error;
pub mod loan;
pub mod comparison;
pub mod sweep;
pub mod config;
pub mod report;

// Re-export commonly used types
pub use error::{ModelError, Result};
pub use loan::{compute_schedule, AmortizationSchedule, LoanTerms};
pub use comparison::{compare_ownership_to_renting, Breakeven, ComparisonResult, MarketAssumptions};
pub use sweep::{SweepConfig, SweepRunner};
pub use config::ModelConfig;
pub use report::ComparisonReport;
