//! Rate conversions shared by the loan and comparison engines

/// Months per year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Below this magnitude a monthly rate is treated as zero
pub(crate) const ZERO_RATE_TOLERANCE: f64 = 1e-12;

/// Convert an annual rate to the equivalent monthly compounding rate
///
/// `(1 + annual)^(1/12) - 1`, so twelve months of compounding give back
/// exactly the annual rate.
pub fn monthly_equivalent_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / MONTHS_PER_YEAR as f64) - 1.0
}
