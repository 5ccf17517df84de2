//! Buy-versus-rent comparison engine
//!
//! Builds two cumulative-loss series over a long monthly horizon:
//! - renting, with the down payment and the monthly savings invested
//! - buying at month 0 and selling at month t, with the freed-up payment
//!   invested once the loan is repaid
//!
//! Their difference gives the month from which owning pays off.

use log::{debug, warn};

use crate::error::Result;
use crate::loan::{monthly_equivalent_rate, AmortizationSchedule, LoanTerms, MONTHS_PER_YEAR};
use super::market::MarketAssumptions;
use super::result::{Breakeven, ComparisonResult};

/// Minimum horizon: 100 years of months
pub const DEFAULT_HORIZON_MONTHS: usize = 1200;

/// Money invested monthly at a fixed compounding rate
///
/// Each contribution made at month k is worth `(1 + rate)^(t - k)` times
/// its amount at month t. Tracking the pot value as a running balance
/// keeps the whole series O(T).
#[derive(Debug, Clone, Copy)]
struct InvestedPot {
    growth: f64,
    value: f64,
    contributed: f64,
}

impl InvestedPot {
    fn new(monthly_rate: f64) -> Self {
        Self {
            growth: 1.0 + monthly_rate,
            value: 0.0,
            contributed: 0.0,
        }
    }

    /// Compound one month, then add this month's contribution
    fn step(&mut self, contribution: f64) {
        self.value = self.value * self.growth + contribution;
        self.contributed += contribution;
    }

    /// Investment income earned so far
    fn gain(&self) -> f64 {
        self.value - self.contributed
    }
}

/// Number of months evaluated for a loan of `term_months`
///
/// Always at least one month past the last payment.
pub fn horizon_months(term_months: usize) -> usize {
    (term_months + 1).max(DEFAULT_HORIZON_MONTHS)
}

/// Compare buying (financed by `loan`) to renting under `market`
pub fn compare_ownership_to_renting(
    market: &MarketAssumptions,
    loan: &LoanTerms,
) -> Result<ComparisonResult> {
    market.validate()?;
    loan.validate()?;

    let borrowed_amount = market.borrowed_amount(loan);
    if borrowed_amount <= 0.0 {
        warn!(
            "Down payment {:.2} covers the acquisition cost {:.2}; nothing to borrow",
            market.down_payment,
            market.acquisition_cost()
        );
    }

    let term_months = loan.term_months();
    let horizon = horizon_months(term_months);
    let schedule = AmortizationSchedule::build(borrowed_amount, term_months, loan.monthly_rate())
        .extended_to(horizon);

    let invest_rate = monthly_equivalent_rate(market.alternative_rate_or(loan.annual_rate));
    let appreciation_rate = monthly_equivalent_rate(market.annual_appreciation_rate);

    let rent_loss = rent_scenario(market, &schedule, invest_rate);
    let buy_loss = buy_scenario(market, &schedule, invest_rate, appreciation_rate);

    let cost_difference: Vec<f64> = rent_loss
        .iter()
        .zip(&buy_loss)
        .map(|(rent, buy)| rent - buy)
        .collect();
    let breakeven_month = Breakeven::from_cost_difference(&cost_difference);

    let result = ComparisonResult {
        borrowed_amount,
        monthly_payment: schedule.monthly_payment,
        total_interest_cost: schedule.total_interest_cost(),
        breakeven_month,
        rent_loss,
        buy_loss,
        cost_difference,
    };

    debug!(
        "rent={:.2} borrowed={:.2} payment={:.2} interest={:.2} breakeven={}",
        market.monthly_rent,
        result.borrowed_amount,
        result.monthly_payment,
        result.total_interest_cost,
        result.breakeven_month
    );

    Ok(result)
}

/// Cumulative loss of renting through month t
///
/// Rent paid, less what the down payment earns when invested instead,
/// less what the monthly difference between loan payment and rent earns.
fn rent_scenario(
    market: &MarketAssumptions,
    schedule: &AmortizationSchedule,
    invest_rate: f64,
) -> Vec<f64> {
    let mut down_payment_pot = InvestedPot::new(invest_rate);
    let mut savings_pot = InvestedPot::new(invest_rate);
    let mut rent_paid = 0.0;

    schedule
        .payment
        .iter()
        .enumerate()
        .map(|(month, &payment)| {
            let rent = if month == 0 { 0.0 } else { market.monthly_rent };
            let down_payment = if month == 0 { market.down_payment } else { 0.0 };

            rent_paid += rent;
            down_payment_pot.step(down_payment);
            savings_pot.step(payment - rent);

            rent_paid - down_payment_pot.gain() - savings_pot.gain()
        })
        .collect()
}

/// Cumulative loss of buying at month 0 and selling at month t
///
/// Down payment, payments and property tax spent, plus the balance still
/// owed at sale, less the sale price and what the freed-up payment earns
/// once the loan is repaid.
fn buy_scenario(
    market: &MarketAssumptions,
    schedule: &AmortizationSchedule,
    invest_rate: f64,
    appreciation_rate: f64,
) -> Vec<f64> {
    let monthly_tax = market.annual_property_tax / MONTHS_PER_YEAR as f64;
    let freed_payment = schedule.monthly_payment.max(0.0);
    let appreciation = 1.0 + appreciation_rate;

    let mut reinvested_pot = InvestedPot::new(invest_rate);
    let mut payments_made = 0.0;

    schedule
        .payment
        .iter()
        .zip(&schedule.outstanding_balance)
        .enumerate()
        .map(|(month, (&payment, &balance))| {
            payments_made += payment;
            let reinvested = if month > schedule.term_months {
                freed_payment
            } else {
                0.0
            };
            reinvested_pot.step(reinvested);

            let sale_price = market.home_price * appreciation.powi(month as i32);
            let property_tax = month as f64 * monthly_tax;

            market.down_payment - sale_price + balance + payments_made + property_tax
                - reinvested_pot.gain()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::loan::MAX_TERM_YEARS;

    fn flat_market() -> MarketAssumptions {
        // No investment income, no appreciation, no tax
        MarketAssumptions {
            monthly_rent: 1_000.0,
            home_price: 200_000.0,
            down_payment: 20_000.0,
            notary_fee_rate: 0.0,
            agency_fee_rate: 0.0,
            annual_property_tax: 0.0,
            alternative_investment_rate: Some(0.0),
            annual_appreciation_rate: 0.0,
        }
    }

    #[test]
    fn test_invested_pot_compounds_geometrically() {
        let mut pot = InvestedPot::new(0.01);
        pot.step(100.0);
        pot.step(0.0);
        pot.step(50.0);
        // 100 * 1.01^2 + 50
        assert!((pot.value - (100.0 * 1.0201 + 50.0)).abs() < 1e-9);
        assert!((pot.gain() - 2.01).abs() < 1e-9);
    }

    #[test]
    fn test_horizon() {
        assert_eq!(horizon_months(180), 1200);
        assert_eq!(horizon_months(1199), 1200);
        assert_eq!(horizon_months(1200), 1201);
    }

    #[test]
    fn test_series_lengths() {
        let market = MarketAssumptions::default();
        let result = compare_ownership_to_renting(&market, &LoanTerms::default()).unwrap();
        assert_eq!(result.horizon(), DEFAULT_HORIZON_MONTHS);
        assert_eq!(result.rent_loss.len(), DEFAULT_HORIZON_MONTHS);
        assert_eq!(result.buy_loss.len(), DEFAULT_HORIZON_MONTHS);
    }

    #[test]
    fn test_longest_loan_leaves_reinvestment_room() {
        let loan = LoanTerms::new(0.02, MAX_TERM_YEARS);
        let result = compare_ownership_to_renting(&MarketAssumptions::default(), &loan).unwrap();
        assert_eq!(result.horizon(), DEFAULT_HORIZON_MONTHS);
        assert!(loan.term_months() + 1 < result.horizon());
    }

    #[test]
    fn test_overlong_loan_rejected() {
        let market = MarketAssumptions::default();
        let loan = LoanTerms::new(0.02, u32::MAX);
        assert!(matches!(
            compare_ownership_to_renting(&market, &loan),
            Err(ModelError::InvalidParameter { name: "term_years", .. })
        ));
    }

    #[test]
    fn test_no_transaction_costs_breaks_even_at_purchase() {
        let loan = LoanTerms::new(0.03, 10);
        let result = compare_ownership_to_renting(&flat_market(), &loan).unwrap();
        assert!(result.cost_difference[0].abs() < 1e-6);
        assert!(result.rent_loss[0].abs() < 1e-12);
    }

    #[test]
    fn test_flat_market_buy_loss_freezes_after_payoff() {
        let loan = LoanTerms::new(0.03, 10);
        let result = compare_ownership_to_renting(&flat_market(), &loan).unwrap();
        let n = loan.term_months();

        // Without investment income or appreciation, owning costs nothing once repaid
        let settled = result.buy_loss[n];
        assert!(result.buy_loss[n + 1..].iter().all(|&loss| (loss - settled).abs() < 1e-6));
        assert!((settled - result.total_interest_cost).abs() < 1e-6);
    }

    #[test]
    fn test_reinvestment_starts_after_term() {
        let market = MarketAssumptions {
            alternative_investment_rate: Some(0.05),
            ..flat_market()
        };
        let loan = LoanTerms::new(0.03, 10);
        let result = compare_ownership_to_renting(&market, &loan).unwrap();
        let n = loan.term_months();
        let i = monthly_equivalent_rate(0.05);

        // First reinvested payment lands at n + 1 and earns from n + 2 on
        assert!((result.buy_loss[n + 1] - result.buy_loss[n]).abs() < 1e-6);
        let expected = result.buy_loss[n] - result.monthly_payment * i;
        assert!((result.buy_loss[n + 2] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_rent_loss_without_investment_income() {
        let loan = LoanTerms::new(0.03, 10);
        let result = compare_ownership_to_renting(&flat_market(), &loan).unwrap();
        for month in [1, 12, 500] {
            assert!((result.rent_loss[month] - 1_000.0 * month as f64).abs() < 1e-6);
        }
    }

    #[test]
    fn test_breakeven_matches_series() {
        let market = MarketAssumptions::default();
        let result = compare_ownership_to_renting(&market, &LoanTerms::default()).unwrap();
        let month = result.breakeven_month.month().unwrap();
        assert!(result.cost_difference[month] >= 0.0);
        assert!(result.cost_difference[..month].iter().all(|&d| d < 0.0));
    }

    #[test]
    fn test_alternative_rate_defaults_to_loan_rate() {
        let loan = LoanTerms::new(0.03, 15);
        let implicit = MarketAssumptions {
            alternative_investment_rate: None,
            ..MarketAssumptions::default()
        };
        let explicit = MarketAssumptions {
            alternative_investment_rate: Some(0.03),
            ..MarketAssumptions::default()
        };
        let a = compare_ownership_to_renting(&implicit, &loan).unwrap();
        let b = compare_ownership_to_renting(&explicit, &loan).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_rent() {
        let market = MarketAssumptions::default().with_rent(0.0);
        let result = compare_ownership_to_renting(&market, &LoanTerms::default()).unwrap();
        assert!(result.cost_difference.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn test_down_payment_covers_cost() {
        let market = MarketAssumptions {
            down_payment: 400_000.0,
            ..MarketAssumptions::default()
        };
        let result = compare_ownership_to_renting(&market, &LoanTerms::default()).unwrap();
        assert!(result.borrowed_amount < 0.0);
        assert!(result.monthly_payment <= 0.0);
        assert!(result.cost_difference.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let market = MarketAssumptions::default();
        assert!(compare_ownership_to_renting(&market, &LoanTerms::new(0.02, 0)).is_err());
        assert!(compare_ownership_to_renting(&market, &LoanTerms::new(-1.2, 15)).is_err());
        let nan_rent = market.with_rent(f64::NAN);
        assert!(compare_ownership_to_renting(&nan_rent, &LoanTerms::default()).is_err());
    }

    #[test]
    fn test_higher_appreciation_never_delays_breakeven() {
        let loan = LoanTerms::default();
        let mut previous = Breakeven::Never;
        for rate in [0.0, 0.005, 0.01, 0.02, 0.03] {
            let market = MarketAssumptions {
                annual_appreciation_rate: rate,
                ..MarketAssumptions::default()
            };
            let breakeven = compare_ownership_to_renting(&market, &loan).unwrap().breakeven_month;
            assert!(breakeven <= previous, "appreciation {}", rate);
            previous = breakeven;
        }
    }
}
