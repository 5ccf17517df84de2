//! Parameter sweeps for comparison tables
//!
//! Holds a base set of assumptions and re-evaluates the model while one
//! parameter varies. Every evaluation is independent, so sweeps run in
//! parallel; output order always follows input order.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::comparison::{compare_ownership_to_renting, Breakeven, MarketAssumptions};
use crate::error::{ensure_non_negative, ModelError, Result};
use crate::loan::{annuity_payment, ensure_term, LoanTerms, MAX_TERM_YEARS};

/// Most rows a single sweep table may hold
pub const MAX_SWEEP_ROWS: usize = 10_000;

/// Ranges swept by [`SweepRunner`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub term_min: u32,
    pub term_max: u32,
    pub rent_min: f64,
    pub rent_max: f64,
    pub rent_step: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            term_min: 5,
            term_max: 25,
            rent_min: 700.0,
            rent_max: 3_000.0,
            rent_step: 50.0,
        }
    }
}

impl SweepConfig {
    /// Loan durations from `term_min` to `term_max` inclusive
    ///
    /// Durations past [`MAX_TERM_YEARS`] are dropped.
    pub fn terms(&self) -> Vec<u32> {
        (self.term_min..=self.term_max.min(MAX_TERM_YEARS)).collect()
    }

    /// Rents from `rent_min` to `rent_max` inclusive, `rent_step` apart
    ///
    /// Empty for a reversed range, capped at [`MAX_SWEEP_ROWS`] levels.
    pub fn rents(&self) -> Vec<f64> {
        let steps = self.rent_steps();
        if self.rent_max < self.rent_min || steps.is_nan() || steps < 0.0 {
            return Vec::new();
        }
        let count = (steps as usize).min(MAX_SWEEP_ROWS - 1) + 1;
        (0..count)
            .map(|k| self.rent_min + k as f64 * self.rent_step)
            .collect()
    }

    /// Number of steps between `rent_min` and `rent_max`
    fn rent_steps(&self) -> f64 {
        // Small slack so a max that is an exact multiple of the step is kept
        ((self.rent_max - self.rent_min) / self.rent_step + 1e-9).floor()
    }

    pub fn validate(&self) -> Result<()> {
        ensure_term("term_min", self.term_min)?;
        ensure_term("term_max", self.term_max)?;
        if self.term_max < self.term_min {
            return Err(ModelError::invalid(
                "term_max",
                self.term_max as f64,
                "must not be below term_min",
            ));
        }

        ensure_non_negative("rent_min", self.rent_min)?;
        ensure_non_negative("rent_max", self.rent_max)?;
        ensure_non_negative("rent_step", self.rent_step)?;
        if self.rent_step == 0.0 {
            return Err(ModelError::invalid("rent_step", 0.0, "must be positive"));
        }
        if self.rent_max < self.rent_min {
            return Err(ModelError::invalid(
                "rent_max",
                self.rent_max,
                "must not be below rent_min",
            ));
        }
        if self.rent_steps() >= MAX_SWEEP_ROWS as f64 {
            return Err(ModelError::invalid(
                "rent_step",
                self.rent_step,
                "gives more than 10000 rent levels",
            ));
        }
        Ok(())
    }
}

/// Monthly payment for one loan duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermSweepRow {
    pub term_years: u32,
    pub monthly_payment: f64,
}

/// Breakeven month for one rent level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentSweepRow {
    pub monthly_rent: f64,
    pub breakeven: Breakeven,
}

/// Monthly payment for each loan duration in `terms`
///
/// The borrowed amount is recomputed per duration, so insurance follows
/// the row's own term.
pub fn payment_by_term(
    market: &MarketAssumptions,
    loan: &LoanTerms,
    terms: &[u32],
) -> Result<Vec<TermSweepRow>> {
    market.validate()?;
    terms
        .par_iter()
        .map(|&term_years| -> Result<TermSweepRow> {
            let terms_for_row = loan.with_term(term_years);
            terms_for_row.validate()?;
            let borrowed = market.borrowed_amount(&terms_for_row);
            let monthly_payment = annuity_payment(
                borrowed,
                terms_for_row.term_months(),
                terms_for_row.monthly_rate(),
            );
            Ok(TermSweepRow {
                term_years,
                monthly_payment,
            })
        })
        .collect()
}

/// Breakeven month for each rent level in `rents`
pub fn breakeven_by_rent(
    market: &MarketAssumptions,
    loan: &LoanTerms,
    rents: &[f64],
) -> Result<Vec<RentSweepRow>> {
    rents
        .par_iter()
        .map(|&monthly_rent| -> Result<RentSweepRow> {
            let result = compare_ownership_to_renting(&market.with_rent(monthly_rent), loan)?;
            Ok(RentSweepRow {
                monthly_rent,
                breakeven: result.breakeven_month,
            })
        })
        .collect()
}

/// Sweep runner over a fixed base scenario
///
/// # Example
/// ```ignore
/// let runner = SweepRunner::new(MarketAssumptions::default(), LoanTerms::default());
/// let table = runner.breakeven_by_rent(&[800.0, 1_000.0, 1_200.0])?;
/// ```
#[derive(Debug, Clone)]
pub struct SweepRunner {
    market: MarketAssumptions,
    loan: LoanTerms,
}

impl SweepRunner {
    pub fn new(market: MarketAssumptions, loan: LoanTerms) -> Self {
        Self { market, loan }
    }

    pub fn payment_by_term(&self, terms: &[u32]) -> Result<Vec<TermSweepRow>> {
        info!("Sweeping {} loan durations", terms.len());
        payment_by_term(&self.market, &self.loan, terms)
    }

    pub fn breakeven_by_rent(&self, rents: &[f64]) -> Result<Vec<RentSweepRow>> {
        info!("Sweeping {} rent levels", rents.len());
        breakeven_by_rent(&self.market, &self.loan, rents)
    }

    /// Both tables over the ranges in `config`
    pub fn run(&self, config: &SweepConfig) -> Result<(Vec<TermSweepRow>, Vec<RentSweepRow>)> {
        config.validate()?;
        Ok((
            self.payment_by_term(&config.terms())?,
            self.breakeven_by_rent(&config.rents())?,
        ))
    }
}

impl Default for SweepRunner {
    fn default() -> Self {
        Self::new(MarketAssumptions::default(), LoanTerms::default())
    }
}
