//! Output structures for the buy-versus-rent comparison

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::loan::MONTHS_PER_YEAR;

/// Month from which owning is at least as cheap as renting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakeven {
    /// First month index with a non-negative cost difference
    Month(usize),
    /// Owning never catches up within the horizon
    Never,
}

impl Breakeven {
    /// Month as a float, `f64::INFINITY` for [`Breakeven::Never`]
    pub fn as_f64(&self) -> f64 {
        match self {
            Breakeven::Month(month) => *month as f64,
            Breakeven::Never => f64::INFINITY,
        }
    }

    pub fn month(&self) -> Option<usize> {
        match self {
            Breakeven::Month(month) => Some(*month),
            Breakeven::Never => None,
        }
    }

    pub fn years(&self) -> Option<f64> {
        self.month().map(|m| m as f64 / MONTHS_PER_YEAR as f64)
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Breakeven::Never)
    }

    /// Locate the first month where `cost_difference` turns non-negative
    pub fn from_cost_difference(cost_difference: &[f64]) -> Self {
        cost_difference
            .iter()
            .position(|&diff| diff >= 0.0)
            .map_or(Breakeven::Never, Breakeven::Month)
    }
}

impl fmt::Display for Breakeven {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Breakeven::Month(month) => write!(f, "{} months", month),
            Breakeven::Never => write!(f, "never"),
        }
    }
}

/// One month of the comparison, for tabular output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub month: usize,
    pub rent_loss: f64,
    pub buy_loss: f64,
    pub cost_difference: f64,
}

/// Result of comparing ownership to renting over the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Amount actually borrowed (fees and insurance included)
    pub borrowed_amount: f64,

    /// Constant monthly loan payment
    pub monthly_payment: f64,

    /// Interest paid over the life of the loan
    pub total_interest_cost: f64,

    /// First month where buying is at least as good as renting
    pub breakeven_month: Breakeven,

    /// Cumulative loss of the renter at month t
    pub rent_loss: Vec<f64>,

    /// Cumulative loss of the buyer (selling at month t)
    pub buy_loss: Vec<f64>,

    /// `rent_loss - buy_loss`; positive favors buying
    pub cost_difference: Vec<f64>,
}

impl ComparisonResult {
    /// Number of months in the horizon
    pub fn horizon(&self) -> usize {
        self.cost_difference.len()
    }

    /// Largest advantage of buying over the horizon
    pub fn max_cost_difference(&self) -> f64 {
        self.cost_difference
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn rows(&self) -> Vec<ComparisonRow> {
        (0..self.horizon())
            .map(|month| ComparisonRow {
                month,
                rent_loss: self.rent_loss[month],
                buy_loss: self.buy_loss[month],
                cost_difference: self.cost_difference[month],
            })
            .collect()
    }

    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            horizon_months: self.horizon(),
            borrowed_amount: self.borrowed_amount,
            monthly_payment: self.monthly_payment,
            total_interest_cost: self.total_interest_cost,
            breakeven_month: self.breakeven_month.month(),
            breakeven_years: self.breakeven_month.years(),
            final_cost_difference: self.cost_difference.last().copied().unwrap_or(0.0),
        }
    }
}

/// Scalar figures of a comparison, for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub horizon_months: usize,
    pub borrowed_amount: f64,
    pub monthly_payment: f64,
    pub total_interest_cost: f64,
    pub breakeven_month: Option<usize>,
    pub breakeven_years: Option<f64>,
    pub final_cost_difference: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakeven_first_non_negative() {
        let diff = [-3.0, -1.0, 0.0, 2.0, -1.0];
        assert_eq!(Breakeven::from_cost_difference(&diff), Breakeven::Month(2));
    }

    #[test]
    fn test_breakeven_never() {
        let diff = [-3.0, -2.0, -0.5];
        let breakeven = Breakeven::from_cost_difference(&diff);
        assert!(breakeven.is_never());
        assert!(breakeven.as_f64().is_infinite());
        assert_eq!(breakeven.years(), None);
    }

    #[test]
    fn test_breakeven_ordering() {
        assert!(Breakeven::Month(10) < Breakeven::Month(11));
        assert!(Breakeven::Month(usize::MAX) < Breakeven::Never);
    }

    #[test]
    fn test_breakeven_display_and_serde() {
        assert_eq!(Breakeven::Month(42).to_string(), "42 months");
        assert_eq!(Breakeven::Never.to_string(), "never");
        assert_eq!(serde_json::to_string(&Breakeven::Never).unwrap(), r#""never""#);
        assert_eq!(serde_json::to_string(&Breakeven::Month(7)).unwrap(), r#"{"month":7}"#);
    }

    #[test]
    fn test_summary() {
        let result = ComparisonResult {
            borrowed_amount: 1_000.0,
            monthly_payment: 90.0,
            total_interest_cost: 80.0,
            breakeven_month: Breakeven::Month(24),
            rent_loss: vec![0.0, 1.0, 2.0],
            buy_loss: vec![1.0, 1.0, 1.0],
            cost_difference: vec![-1.0, 0.0, 1.0],
        };
        let summary = result.summary();
        assert_eq!(summary.horizon_months, 3);
        assert_eq!(summary.breakeven_years, Some(2.0));
        assert_eq!(summary.final_cost_difference, 1.0);
        assert_eq!(result.max_cost_difference(), 1.0);
        assert_eq!(result.rows()[1].rent_loss, 1.0);
    }
}
