use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{ClientSummary, ServiceSummary};
use crate::models::{Invoice, InvoiceWithParties};

#[derive(Debug, Deserialize, Validate)]
pub struct IssueInvoiceRequest {
    pub service_id: Uuid,
    #[validate(range(min = 0, message = "Reading must not be negative"))]
    pub current_reading: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviseReadingRequest {
    #[validate(range(min = 0, message = "Reading must not be negative"))]
    pub current_reading: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetInvoicePaidRequest {
    pub paid: bool,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
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

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            invoice_id: invoice.invoice_id,
            service_id: invoice.service_id,
            issued_utc: invoice.issued_utc,
            period_year: invoice.period_year,
            period_month: invoice.period_month,
            base_allowance: invoice.base_allowance,
            overage_unit: invoice.overage_unit,
            base_price: invoice.base_price,
            overage_unit_price: invoice.overage_unit_price,
            previous_reading: invoice.previous_reading,
            current_reading: invoice.current_reading,
            total_consumption: invoice.total_consumption,
            total_amount: invoice.total_amount,
            paid: invoice.paid,
        }
    }
}

/// An invoice with its service connection and owning client.
#[derive(Debug, Serialize)]
pub struct InvoiceDetailResponse {
    pub invoice_id: Uuid,
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
    pub service: ServiceSummary,
    pub client: ClientSummary,
}

impl From<InvoiceWithParties> for InvoiceDetailResponse {
    fn from(row: InvoiceWithParties) -> Self {
        Self {
            invoice_id: row.invoice_id,
            issued_utc: row.issued_utc,
            period_year: row.period_year,
            period_month: row.period_month,
            base_allowance: row.base_allowance,
            overage_unit: row.overage_unit,
            base_price: row.base_price,
            overage_unit_price: row.overage_unit_price,
            previous_reading: row.previous_reading,
            current_reading: row.current_reading,
            total_consumption: row.total_consumption,
            total_amount: row.total_amount,
            paid: row.paid,
            service: ServiceSummary {
                service_id: row.service_id,
                connection_number: row.connection_number,
                meter_number: row.meter_number,
                address: row.address,
                active: row.service_active,
                previous_reading: row.service_previous_reading,
            },
            client: ClientSummary {
                client_id: row.client_id,
                national_id: row.national_id,
                first_names: row.first_names,
                last_names: row.last_names,
                phone: row.phone,
            },
        }
    }
}
