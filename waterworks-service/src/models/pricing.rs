use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Tiered-pricing parameters. At most one row exists; the schema enforces
/// the singleton. Issued invoices snapshot these values, so the row cannot
/// change while invoices for the current calendar month exist.
#[derive(Debug, Clone, FromRow)]
pub struct PricingConfig {
    pub config_id: Uuid,
    /// Consumption volume covered by the base price, in m3.
    pub base_allowance: Decimal,
    /// Volumetric size of one overage unit, in m3.
    pub overage_unit: Decimal,
    pub base_price: Decimal,
    pub overage_unit_price: Decimal,
    pub reconnection_fee: Decimal,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating the pricing row; every value is required.
#[derive(Debug, Clone)]
pub struct CreatePricing {
    pub base_allowance: Decimal,
    pub overage_unit: Decimal,
    pub base_price: Decimal,
    pub overage_unit_price: Decimal,
    pub reconnection_fee: Decimal,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdatePricing {
    pub base_allowance: Option<Decimal>,
    pub overage_unit: Option<Decimal>,
    pub base_price: Option<Decimal>,
    pub overage_unit_price: Option<Decimal>,
    pub reconnection_fee: Option<Decimal>,
}
