use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Monthly usage invoice for one service connection.
///
/// Pricing fields are an immutable snapshot of the configuration at
/// issuance; reading revisions recompute against the snapshot, never the
/// live configuration. At most one invoice exists per service per calendar
/// month (`period_year`/`period_month` unique constraint).
#[derive(Debug, Clone, FromRow)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub service_id: Uuid,
    pub issued_utc: DateTime<Utc>,
    pub period_year: i32,
    pub period_month: i32,
    pub base_allowance: Decimal,
    pub overage_unit: Decimal,
    pub base_price: Decimal,
    pub overage_unit_price: Decimal,
    pub previous_reading: i64,
    pub current_reading: i64,
    pub total_consumption: i64,
    pub total_amount: Decimal,
    pub paid: bool,
}

/// An invoice joined with its service connection and owning client.
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceWithParties {
    pub invoice_id: Uuid,
    pub service_id: Uuid,
    pub issued_utc: DateTime<Utc>,
    pub period_year: i32,
    pub period_month: i32,
    pub base_allowance: Decimal,
    pub overage_unit: Decimal,
    pub base_price: Decimal,
    pub overage_unit_price: Decimal,
    pub previous_reading: i64,
    pub current_reading: i64,
    pub total_consumption: i64,
    pub total_amount: Decimal,
    pub paid: bool,
    pub connection_number: i64,
    pub meter_number: i64,
    pub address: String,
    pub service_active: bool,
    pub service_previous_reading: i64,
    pub client_id: Uuid,
    pub national_id: String,
    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
}
