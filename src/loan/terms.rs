//! Financing terms of a fixed-rate loan

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_rate, ModelError, Result};
use super::rates::{monthly_equivalent_rate, MONTHS_PER_YEAR};
use super::schedule::{compute_schedule, AmortizationSchedule};

/// Default loan rate (2%)
pub const DEFAULT_ANNUAL_RATE: f64 = 0.02;

/// Default loan duration in years
pub const DEFAULT_TERM_YEARS: u32 = 15;

/// Default borrower insurance, as a yearly fraction of the borrowed amount
pub const DEFAULT_INSURANCE_RATE: f64 = 0.004;

/// Longest loan accepted, in years
///
/// Keeps every loan inside the 1200-month comparison horizon with at
/// least one month of post-payoff reinvestment.
pub const MAX_TERM_YEARS: u32 = 99;

/// Terms of a constant-payment loan
///
/// The borrowed amount is not part of the terms: the comparison engine
/// derives it from the property price, fees, and down payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTerms {
    /// Annual interest rate as a fraction (0.02 = 2%)
    pub annual_rate: f64,

    /// Loan duration in whole years
    pub term_years: u32,

    /// Yearly borrower insurance as a fraction of the borrowed amount
    /// None = insurance not modeled
    pub insurance_rate: Option<f64>,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            annual_rate: DEFAULT_ANNUAL_RATE,
            term_years: DEFAULT_TERM_YEARS,
            insurance_rate: Some(DEFAULT_INSURANCE_RATE),
        }
    }
}

impl LoanTerms {
    /// Terms without borrower insurance
    pub fn new(annual_rate: f64, term_years: u32) -> Self {
        Self {
            annual_rate,
            term_years,
            insurance_rate: None,
        }
    }

    /// Same terms with borrower insurance modeled
    pub fn with_insurance(mut self, insurance_rate: f64) -> Self {
        self.insurance_rate = Some(insurance_rate);
        self
    }

    /// Same terms with a different duration
    pub fn with_term(mut self, term_years: u32) -> Self {
        self.term_years = term_years;
        self
    }

    pub fn term_months(&self) -> usize {
        self.term_years as usize * MONTHS_PER_YEAR as usize
    }

    pub fn monthly_rate(&self) -> f64 {
        monthly_equivalent_rate(self.annual_rate)
    }

    /// Multiplier applied to the borrowed amount to fold in cumulative insurance
    pub fn insurance_factor(&self) -> f64 {
        match self.insurance_rate {
            Some(rate) => 1.0 + self.term_years as f64 * rate,
            None => 1.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_term("term_years", self.term_years)?;
        ensure_rate("annual_rate", self.annual_rate)?;
        if let Some(rate) = self.insurance_rate {
            ensure_non_negative("insurance_rate", rate)?;
        }
        Ok(())
    }

    /// Amortization schedule for the given borrowed amount
    pub fn schedule(&self, principal: f64) -> Result<AmortizationSchedule> {
        compute_schedule(principal, self.term_years, self.annual_rate)
    }
}

/// Loan durations must lie in `1..=MAX_TERM_YEARS`
pub(crate) fn ensure_term(name: &'static str, term_years: u32) -> Result<()> {
    if term_years == 0 {
        return Err(ModelError::invalid(name, 0.0, "must be at least one year"));
    }
    if term_years > MAX_TERM_YEARS {
        return Err(ModelError::invalid(
            name,
            term_years as f64,
            "must not exceed 99 years",
        ));
    }
    Ok(())
}
