use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PricingConfig;

/// Pricing upsert. When no configuration exists yet every value is
/// required; afterwards absent fields keep their stored value.
#[derive(Debug, Deserialize, Default)]
pub struct UpdatePricingRequest {
    pub base_allowance: Option<Decimal>,
    pub overage_unit: Option<Decimal>,
    pub base_price: Option<Decimal>,
    pub overage_unit_price: Option<Decimal>,
    pub reconnection_fee: Option<Decimal>,
}

impl UpdatePricingRequest {
    /// Every provided value must be positive; volumes of zero would break
    /// the overage division and negative prices are nonsense.
    pub fn positive_values(&self) -> bool {
        [
            self.base_allowance,
            self.overage_unit,
            self.base_price,
            self.overage_unit_price,
            self.reconnection_fee,
        ]
        .iter()
        .flatten()
        .all(|value| *value > Decimal::ZERO)
    }
}

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pub base_allowance: Decimal,
    pub overage_unit: Decimal,
    pub base_price: Decimal,
    pub overage_unit_price: Decimal,
    pub reconnection_fee: Decimal,
    pub updated_utc: DateTime<Utc>,
}

impl From<PricingConfig> for PricingResponse {
    fn from(config: PricingConfig) -> Self {
        Self {
            base_allowance: config.base_allowance,
            overage_unit: config.overage_unit,
            base_price: config.base_price,
            overage_unit_price: config.overage_unit_price,
            reconnection_fee: config.reconnection_fee,
            updated_utc: config.updated_utc,
        }
    }
}
