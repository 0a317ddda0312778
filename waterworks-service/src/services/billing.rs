//! Tiered consumption pricing.

use rust_decimal::Decimal;
use service_core::error::AppError;

use crate::models::{Invoice, PricingConfig};

/// The pricing parameters a charge is computed against: the live
/// configuration at issuance, or an invoice's own snapshot at revision.
#[derive(Debug, Clone, Copy)]
pub struct PricingTerms {
    pub base_allowance: Decimal,
    pub overage_unit: Decimal,
    pub base_price: Decimal,
    pub overage_unit_price: Decimal,
}

impl PricingTerms {
    pub fn of_config(config: &PricingConfig) -> Self {
        Self {
            base_allowance: config.base_allowance,
            overage_unit: config.overage_unit,
            base_price: config.base_price,
            overage_unit_price: config.overage_unit_price,
        }
    }

    pub fn of_invoice(invoice: &Invoice) -> Self {
        Self {
            base_allowance: invoice.base_allowance,
            overage_unit: invoice.overage_unit,
            base_price: invoice.base_price,
            overage_unit_price: invoice.overage_unit_price,
        }
    }
}

/// Charge for one billing period's consumption.
///
/// Consumption at or under the base allowance costs exactly the base price.
/// Beyond it, every overage unit costs the overage unit price on top;
/// `overage_unit` is the volumetric size of one unit, so the division yields
/// a fractional unit count and the charge scales linearly.
pub fn consumption_charge(terms: &PricingTerms, consumption: i64) -> Result<Decimal, AppError> {
    let consumed = Decimal::from(consumption);
    if consumed <= terms.base_allowance {
        return Ok(terms.base_price);
    }

    if terms.overage_unit <= Decimal::ZERO {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "overage unit size must be positive"
        )));
    }

    let overage_units = (consumed - terms.base_allowance) / terms.overage_unit;
    Ok(terms.base_price + overage_units * terms.overage_unit_price)
}
