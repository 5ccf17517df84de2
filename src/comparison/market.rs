//! Market and household assumptions for the buy-versus-rent comparison

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_rate, Result};
use crate::loan::LoanTerms;

/// Property, rent, and investment assumptions for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketAssumptions {
    /// Rent of an equivalent property, per month
    pub monthly_rent: f64,

    /// Purchase price of the property
    pub home_price: f64,

    /// Capital contributed by the buyer at purchase
    pub down_payment: f64,

    /// Notary / solicitor fee as a fraction of the price
    pub notary_fee_rate: f64,

    /// Agency fee as a fraction of the price
    pub agency_fee_rate: f64,

    /// Yearly ownership charges (property tax and similar)
    pub annual_property_tax: f64,

    /// Annual return of the alternative investment
    /// None = same as the loan rate
    pub alternative_investment_rate: Option<f64>,

    /// Annual growth of the property's market value
    pub annual_appreciation_rate: f64,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            monthly_rent: 1_200.0,
            home_price: 250_000.0,
            down_payment: 60_000.0,
            notary_fee_rate: 0.08,
            agency_fee_rate: 0.05,
            annual_property_tax: 2_200.0,
            alternative_investment_rate: Some(0.01),
            annual_appreciation_rate: 0.005,
        }
    }
}

impl MarketAssumptions {
    /// Price including notary and agency fees
    pub fn acquisition_cost(&self) -> f64 {
        self.home_price * (1.0 + self.notary_fee_rate) * (1.0 + self.agency_fee_rate)
    }

    /// Amount to borrow under the given terms
    ///
    /// Acquisition cost minus down payment, inflated by cumulative borrower
    /// insurance when the terms model it. May be zero or negative when the
    /// down payment covers the whole cost.
    pub fn borrowed_amount(&self, loan: &LoanTerms) -> f64 {
        (self.acquisition_cost() - self.down_payment) * loan.insurance_factor()
    }

    /// Annual alternative investment rate, falling back to the loan rate
    pub fn alternative_rate_or(&self, loan_rate: f64) -> f64 {
        self.alternative_investment_rate.unwrap_or(loan_rate)
    }

    pub fn with_rent(mut self, monthly_rent: f64) -> Self {
        self.monthly_rent = monthly_rent;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("monthly_rent", self.monthly_rent)?;
        ensure_non_negative("home_price", self.home_price)?;
        ensure_non_negative("down_payment", self.down_payment)?;
        ensure_non_negative("notary_fee_rate", self.notary_fee_rate)?;
        ensure_non_negative("agency_fee_rate", self.agency_fee_rate)?;
        ensure_non_negative("annual_property_tax", self.annual_property_tax)?;
        if let Some(rate) = self.alternative_investment_rate {
            ensure_rate("alternative_investment_rate", rate)?;
        }
        ensure_rate("annual_appreciation_rate", self.annual_appreciation_rate)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrowed_amount_without_insurance() {
        let market = MarketAssumptions::default();
        let loan = LoanTerms::new(0.02, 15);
        // 250000 * 1.08 * 1.05 - 60000
        assert!((market.borrowed_amount(&loan) - 223_500.0).abs() < 1e-6);
    }

    #[test]
    fn test_borrowed_amount_with_insurance() {
        let market = MarketAssumptions::default();
        let loan = LoanTerms::new(0.02, 15).with_insurance(0.004);
        assert!((market.borrowed_amount(&loan) - 223_500.0 * 1.06).abs() < 1e-6);
    }

    #[test]
    fn test_down_payment_exceeds_cost() {
        let market = MarketAssumptions {
            down_payment: 400_000.0,
            ..MarketAssumptions::default()
        };
        assert!(market.borrowed_amount(&LoanTerms::new(0.02, 15)) < 0.0);
    }

    #[test]
    fn test_alternative_rate_fallback() {
        let market = MarketAssumptions {
            alternative_investment_rate: None,
            ..MarketAssumptions::default()
        };
        assert_eq!(market.alternative_rate_or(0.03), 0.03);
        assert_eq!(MarketAssumptions::default().alternative_rate_or(0.03), 0.01);
    }

    #[test]
    fn test_validate() {
        assert!(MarketAssumptions::default().validate().is_ok());
        assert!(MarketAssumptions::default().with_rent(0.0).validate().is_ok());
        assert!(MarketAssumptions::default().with_rent(-5.0).validate().is_err());

        let bad_rate = MarketAssumptions {
            annual_appreciation_rate: -1.5,
            ..MarketAssumptions::default()
        };
        assert!(bad_rate.validate().is_err());
    }
}
