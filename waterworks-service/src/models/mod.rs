//! Domain models for waterworks-service.

mod admin;
mod audit;
mod client;
mod invoice;
mod notification;
mod payment;
mod pricing;
mod service;

pub use admin::{Admin, AdminSession};
pub use audit::{AuditCategory, AuditEntry};
pub use client::{Client, CreateClient, UpdateClient};
pub use invoice::{Invoice, InvoiceWithParties};
pub use notification::{Notification, NotificationWithParties};
pub use payment::{
    ConnectionPayment, CreateConnectionPayment, PaymentKind, PaymentWithParties,
};
pub use pricing::{CreatePricing, PricingConfig, UpdatePricing};
pub use service::{
    CreateServiceConnection, ServiceConnection, ServiceOverview, UpdateServiceConnection,
};
