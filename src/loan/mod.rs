//! Amortization engine for constant-payment loans

mod rates;
mod schedule;
mod terms;

pub use rates::{monthly_equivalent_rate, MONTHS_PER_YEAR};
pub use schedule::{annuity_payment, compute_schedule, AmortizationSchedule, ScheduleRow};
pub(crate) use terms::ensure_term;
pub use terms::{
    LoanTerms, DEFAULT_ANNUAL_RATE, DEFAULT_INSURANCE_RATE, DEFAULT_TERM_YEARS, MAX_TERM_YEARS,
};
