use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EntityCountsResponse {
    pub clients: i64,
    pub services: i64,
    pub unpaid_invoices: i64,
}

/// Invoice totals for the current ISO week (Monday first) and the current
/// year's months (January first).
#[derive(Debug, Serialize)]
pub struct InvoiceRevenueResponse {
    pub weekdays: Vec<Decimal>,
    pub months: Vec<Decimal>,
}

/// Collected connection-fee totals per month, one series per payment kind.
#[derive(Debug, Serialize)]
pub struct ConnectionRevenueResponse {
    pub upfront: Vec<Decimal>,
    pub financed: Vec<Decimal>,
    pub reconnection: Vec<Decimal>,
}
