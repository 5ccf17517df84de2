//! Constant-payment amortization schedule

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_rate, ModelError, Result};
use super::rates::{monthly_equivalent_rate, MONTHS_PER_YEAR, ZERO_RATE_TOLERANCE};
use super::terms::ensure_term;

/// One month of an amortization schedule, for tabular output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: usize,
    pub outstanding_balance: f64,
    pub payment: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
}

/// Monthly schedule of a constant-payment loan
///
/// Index 0 is the disbursement instant: the full principal is owed and
/// nothing has been paid. Months `1..=term_months` carry the constant
/// payment. Entries past the term (after [`extended_to`]) are zero.
///
/// [`extended_to`]: AmortizationSchedule::extended_to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Borrowed amount
    pub principal: f64,

    /// Monthly compounding rate
    pub monthly_rate: f64,

    /// Number of monthly payments
    pub term_months: usize,

    /// Constant payment due each month of the term
    pub monthly_payment: f64,

    /// Amount still owed after the payment of month t
    pub outstanding_balance: Vec<f64>,

    /// Payment made in month t
    pub payment: Vec<f64>,

    /// Part of the payment that repays principal
    pub principal_paid: Vec<f64>,

    /// Part of the payment that pays interest
    pub interest_paid: Vec<f64>,
}

/// Compute the monthly schedule of a constant-payment loan
///
/// Fails with [`ModelError::InvalidParameter`] when the principal is not
/// strictly positive, the term is outside `1..=MAX_TERM_YEARS`, or the rate
/// is at or below -100%.
pub fn compute_schedule(
    principal: f64,
    term_years: u32,
    annual_rate: f64,
) -> Result<AmortizationSchedule> {
    ensure_finite("principal", principal)?;
    if principal <= 0.0 {
        return Err(ModelError::invalid("principal", principal, "must be positive"));
    }
    ensure_term("term_years", term_years)?;
    ensure_rate("annual_rate", annual_rate)?;

    let term_months = term_years as usize * MONTHS_PER_YEAR as usize;
    Ok(AmortizationSchedule::build(
        principal,
        term_months,
        monthly_equivalent_rate(annual_rate),
    ))
}

/// Constant payment that repays `principal` over `term_months` at `monthly_rate`
pub fn annuity_payment(principal: f64, term_months: usize, monthly_rate: f64) -> f64 {
    if monthly_rate.abs() < ZERO_RATE_TOLERANCE {
        return principal / term_months as f64;
    }
    principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powi(-(term_months as i32)))
}

impl AmortizationSchedule {
    /// Build a schedule without checking the principal's sign
    ///
    /// A non-positive principal yields a non-positive payment and mirrored
    /// balances. `term_months` must be at least 1.
    pub(crate) fn build(principal: f64, term_months: usize, monthly_rate: f64) -> Self {
        let len = term_months + 1;
        let monthly_payment = annuity_payment(principal, term_months, monthly_rate);

        let mut outstanding_balance = Vec::with_capacity(len);
        let mut payment = Vec::with_capacity(len);
        let mut principal_paid = Vec::with_capacity(len);
        let mut interest_paid = Vec::with_capacity(len);

        outstanding_balance.push(principal);
        payment.push(0.0);
        principal_paid.push(0.0);
        interest_paid.push(0.0);

        let growth = 1.0 + monthly_rate;
        let mut repaid = 0.0;
        for t in 1..=term_months {
            // Payment t discounted over the periods left
            let principal_part = monthly_payment / growth.powi((term_months - t + 1) as i32);
            repaid += principal_part;

            outstanding_balance.push(principal - repaid);
            payment.push(monthly_payment);
            principal_paid.push(principal_part);
            interest_paid.push(monthly_payment - principal_part);
        }

        Self {
            principal,
            monthly_rate,
            term_months,
            monthly_payment,
            outstanding_balance,
            payment,
            principal_paid,
            interest_paid,
        }
    }

    /// Number of months covered, including month 0
    pub fn len(&self) -> usize {
        self.payment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payment.is_empty()
    }

    /// Schedule truncated or zero-padded to `horizon` months
    pub fn extended_to(&self, horizon: usize) -> Self {
        let resize = |series: &[f64]| {
            let mut out = series[..series.len().min(horizon)].to_vec();
            out.resize(horizon, 0.0);
            out
        };

        Self {
            principal: self.principal,
            monthly_rate: self.monthly_rate,
            term_months: self.term_months,
            monthly_payment: self.monthly_payment,
            outstanding_balance: resize(&self.outstanding_balance),
            payment: resize(&self.payment),
            principal_paid: resize(&self.principal_paid),
            interest_paid: resize(&self.interest_paid),
        }
    }

    /// Total interest paid to the lender
    ///
    /// Non-negative for rates at or above zero. A negative rate (above
    /// -100%) is accepted and gives a negative total: the borrower repays
    /// less than was lent.
    pub fn total_interest_cost(&self) -> f64 {
        self.interest_paid.iter().sum()
    }

    pub fn total_principal_paid(&self) -> f64 {
        self.principal_paid.iter().sum()
    }

    pub fn total_paid(&self) -> f64 {
        self.payment.iter().sum()
    }

    /// Per-month rows for tabular output
    pub fn rows(&self) -> Vec<ScheduleRow> {
        (0..self.len())
            .map(|month| ScheduleRow {
                month,
                outstanding_balance: self.outstanding_balance[month],
                payment: self.payment[month],
                principal_paid: self.principal_paid[month],
                interest_paid: self.interest_paid[month],
            })
            .collect()
    }
}
