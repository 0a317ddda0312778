use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{ClientSummary, ServiceSummary};
use crate::models::{ConnectionPayment, PaymentWithParties};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    pub service_id: Uuid,
    /// One of `upfront`, `financed`, `reconnection`.
    #[validate(length(min = 1, message = "Payment kind is required"))]
    pub kind: String,
    /// Optional for `reconnection`, which defaults to the configured fee.
    pub total: Option<Decimal>,
    #[serde(default)]
    pub down_payment: Decimal,
}

/// Overwrites all six installments; absent values are written as zero.
#[derive(Debug, Deserialize, Default)]
pub struct InstallmentsRequest {
    pub installment_1: Option<Decimal>,
    pub installment_2: Option<Decimal>,
    pub installment_3: Option<Decimal>,
    pub installment_4: Option<Decimal>,
    pub installment_5: Option<Decimal>,
    pub installment_6: Option<Decimal>,
}

impl InstallmentsRequest {
    pub fn to_array(&self) -> [Decimal; 6] {
        [
            self.installment_1.unwrap_or_default(),
            self.installment_2.unwrap_or_default(),
            self.installment_3.unwrap_or_default(),
            self.installment_4.unwrap_or_default(),
            self.installment_5.unwrap_or_default(),
            self.installment_6.unwrap_or_default(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub payment_id: Uuid,
    pub service_id: Uuid,
    pub kind: String,
    pub issued_utc: DateTime<Utc>,
    pub total: Decimal,
    pub down_payment: Decimal,
    pub installment_1: Decimal,
    pub installment_2: Decimal,
    pub installment_3: Decimal,
    pub installment_4: Decimal,
    pub installment_5: Decimal,
    pub installment_6: Decimal,
    pub paid_total: Decimal,
    pub outstanding: Decimal,
}

impl From<ConnectionPayment> for PaymentResponse {
    fn from(payment: ConnectionPayment) -> Self {
        let paid_total = payment.paid_total();
        let outstanding = payment.outstanding();
        Self {
            payment_id: payment.payment_id,
            service_id: payment.service_id,
            kind: payment.kind,
            issued_utc: payment.issued_utc,
            total: payment.total,
            down_payment: payment.down_payment,
            installment_1: payment.installment_1,
            installment_2: payment.installment_2,
            installment_3: payment.installment_3,
            installment_4: payment.installment_4,
            installment_5: payment.installment_5,
            installment_6: payment.installment_6,
            paid_total,
            outstanding,
        }
    }
}

/// A payment with its service connection and owning client.
#[derive(Debug, Serialize)]
pub struct PaymentDetailResponse {
    pub payment_id: Uuid,
    pub kind: String,
    pub issued_utc: DateTime<Utc>,
    pub total: Decimal,
    pub down_payment: Decimal,
    pub installment_1: Decimal,
    pub installment_2: Decimal,
    pub installment_3: Decimal,
    pub installment_4: Decimal,
    pub installment_5: Decimal,
    pub installment_6: Decimal,
    pub paid_total: Decimal,
    pub outstanding: Decimal,
    pub service: ServiceSummary,
    pub client: ClientSummary,
}

impl From<PaymentWithParties> for PaymentDetailResponse {
    fn from(row: PaymentWithParties) -> Self {
        let paid_total = row.paid_total();
        let outstanding = row.outstanding();
        Self {
            payment_id: row.payment_id,
            kind: row.kind,
            issued_utc: row.issued_utc,
            total: row.total,
            down_payment: row.down_payment,
            installment_1: row.installment_1,
            installment_2: row.installment_2,
            installment_3: row.installment_3,
            installment_4: row.installment_4,
            installment_5: row.installment_5,
            installment_6: row.installment_6,
            paid_total,
            outstanding,
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
