use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::types::RoundingAdjustment;

/// business limits and rounding policy applied by the calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculatorConfig {
    /// smallest principal a group may apply for
    pub minimum_principal: Money,
    /// upper bound on the annual rate, in percent
    pub maximum_rate_percent: Decimal,
    /// longest term accepted
    pub maximum_term_months: u32,
    pub rounding_adjustment: RoundingAdjustment,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            minimum_principal: Money::from_major(100),
            maximum_rate_percent: dec!(100),
            maximum_term_months: 360,
            rounding_adjustment: RoundingAdjustment::None,
        }
    }
}

impl CalculatorConfig {
    /// default limits with the final installment absorbing rounding drift
    pub fn balanced() -> Self {
        Self {
            rounding_adjustment: RoundingAdjustment::BalanceFinalInstallment,
            ..Self::default()
        }
    }

    /// load from a json document; omitted keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CalculatorConfig =
            serde_json::from_str(json).map_err(|e| CalculatorError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// check that the limits are internally consistent
    pub fn validate(&self) -> Result<()> {
        if self.minimum_principal.is_negative() {
            return Err(CalculatorError::InvalidConfiguration {
                message: format!(
                    "minimum principal cannot be negative: {}",
                    self.minimum_principal
                ),
            });
        }

        if self.maximum_rate_percent < Decimal::ZERO || self.maximum_rate_percent > dec!(100) {
            return Err(CalculatorError::InvalidConfiguration {
                message: format!(
                    "maximum rate must be between 0 and 100 percent: {}",
                    self.maximum_rate_percent
                ),
            });
        }

        if self.maximum_term_months == 0 {
            return Err(CalculatorError::InvalidConfiguration {
                message: "maximum term must be at least 1 month".to_string(),
            });
        }

        Ok(())
    }
}
