//! CSV and JSON output for schedules, comparisons, and sweeps

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::comparison::{ComparisonResult, ComparisonRow, ComparisonSummary, MarketAssumptions};
use crate::error::Result;
use crate::loan::{AmortizationSchedule, LoanTerms};
use crate::sweep::{RentSweepRow, TermSweepRow};

/// Flat CSV form of [`RentSweepRow`]; "never" is an empty breakeven cell
#[derive(Debug, Serialize)]
struct RentSweepCsvRow {
    monthly_rent: f64,
    breakeven_month: Option<usize>,
}

/// Write the schedule, one row per month
pub fn write_schedule_csv<W: Write>(writer: W, schedule: &AmortizationSchedule) -> Result<()> {
    write_rows(writer, schedule.rows())
}

/// Write rent loss, buy loss, and their difference, one row per month
pub fn write_comparison_csv<W: Write>(writer: W, result: &ComparisonResult) -> Result<()> {
    write_rows(writer, result.rows())
}

pub fn write_term_sweep_csv<W: Write>(writer: W, rows: &[TermSweepRow]) -> Result<()> {
    write_rows(writer, rows.iter().copied())
}

pub fn write_rent_sweep_csv<W: Write>(writer: W, rows: &[RentSweepRow]) -> Result<()> {
    write_rows(
        writer,
        rows.iter().map(|row| RentSweepCsvRow {
            monthly_rent: row.monthly_rent,
            breakeven_month: row.breakeven.month(),
        }),
    )
}

fn write_rows<W, I, R>(writer: W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: Serialize,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// JSON report of one comparison
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub market: MarketAssumptions,
    pub loan: LoanTerms,
    pub summary: ComparisonSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_sweep: Option<Vec<TermSweepRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_sweep: Option<Vec<RentSweepRow>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cashflows: Vec<ComparisonRow>,
}

impl ComparisonReport {
    pub fn new(market: MarketAssumptions, loan: LoanTerms, result: &ComparisonResult) -> Self {
        Self {
            generated_at: Utc::now(),
            market,
            loan,
            summary: result.summary(),
            term_sweep: None,
            rent_sweep: None,
            cashflows: Vec::new(),
        }
    }

    pub fn with_sweeps(
        mut self,
        term_sweep: Vec<TermSweepRow>,
        rent_sweep: Vec<RentSweepRow>,
    ) -> Self {
        self.term_sweep = Some(term_sweep);
        self.rent_sweep = Some(rent_sweep);
        self
    }

    /// Include the monthly series
    pub fn with_cashflows(mut self, result: &ComparisonResult) -> Self {
        self.cashflows = result.rows();
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
