//! Request/response types for waterworks-service.

mod admin;
mod audit;
mod auth;
mod client;
mod invoice;
mod notification;
mod payment;
mod pricing;
mod service;
mod stats;

pub use admin::{AdminResponse, CreateAdminRequest, ResetPasswordRequest};
pub use audit::AuditEntryResponse;
pub use auth::{LoginRequest, SessionResponse};
pub use client::{ClientResponse, ClientSummary, CreateClientRequest, UpdateClientRequest};
pub use invoice::{
    InvoiceDetailResponse, InvoiceResponse, IssueInvoiceRequest, ReviseReadingRequest,
    SetInvoicePaidRequest,
};
pub use notification::{NotificationDetailResponse, NotificationResponse};
pub use payment::{
    CreatePaymentRequest, InstallmentsRequest, PaymentDetailResponse, PaymentResponse,
};
pub use pricing::{PricingResponse, UpdatePricingRequest};
pub use service::{
    CreateServiceRequest, ReassignServiceRequest, ServiceOverviewResponse, ServiceResponse,
    ServiceStatusRequest, ServiceSummary, UpdateServiceRequest,
};
pub use stats::{ConnectionRevenueResponse, EntityCountsResponse, InvoiceRevenueResponse};

use serde::Serialize;

/// Confirmation body for mutations with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body for bulk deletions.
#[derive(Debug, Serialize)]
pub struct DeletedCountResponse {
    pub deleted: u64,
}
