//! JSON model configuration
//!
//! Every section and field is optional; missing values fall back to the
//! defaults of [`MarketAssumptions`], [`LoanTerms`], and [`SweepConfig`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::comparison::MarketAssumptions;
use crate::error::Result;
use crate::loan::LoanTerms;
use crate::sweep::SweepConfig;

/// Default path of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/home_ownership.json";

/// Complete set of model inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub market: MarketAssumptions,
    pub loan: LoanTerms,
    pub sweep: SweepConfig,
}

impl ModelConfig {
    /// Load configuration from the default location, or defaults if the file is absent
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::from_json_path(path)
        } else {
            log::debug!("No config at {}, using defaults", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.market.validate()?;
        self.loan.validate()?;
        self.sweep.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = ModelConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = ModelConfig::from_json_str(
            r#"{
                "market": { "monthly_rent": 950.0, "alternative_investment_rate": null },
                "loan": { "term_years": 20, "insurance_rate": null }
            }"#,
        )
        .unwrap();
        assert_eq!(config.market.monthly_rent, 950.0);
        assert_eq!(config.market.alternative_investment_rate, None);
        assert_eq!(config.market.home_price, 250_000.0);
        assert_eq!(config.loan.term_years, 20);
        assert_eq!(config.loan.insurance_rate, None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ModelConfig::from_json_str(r#"{ "loan": { "term_years": 0 } }"#).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameter { name: "term_years", .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = ModelConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ModelError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ModelConfig::from_json_path(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
