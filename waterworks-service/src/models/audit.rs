use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// What an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditCategory {
    Login,
    ClientCreated,
    ClientDeleted,
    ServiceCreated,
    ServiceDeleted,
    InvoiceIssued,
    InvoiceDeleted,
    NotificationCreated,
    NotificationSettled,
    NotificationDeleted,
}

impl AuditCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditCategory::Login => "login",
            AuditCategory::ClientCreated => "client_created",
            AuditCategory::ClientDeleted => "client_deleted",
            AuditCategory::ServiceCreated => "service_created",
            AuditCategory::ServiceDeleted => "service_deleted",
            AuditCategory::InvoiceIssued => "invoice_issued",
            AuditCategory::InvoiceDeleted => "invoice_deleted",
            AuditCategory::NotificationCreated => "notification_created",
            AuditCategory::NotificationSettled => "notification_settled",
            AuditCategory::NotificationDeleted => "notification_deleted",
        }
    }
}

/// An audit entry joined with the acting admin's username.
#[derive(Debug, Clone, FromRow)]
pub struct AuditEntry {
    pub log_id: Uuid,
    pub category: String,
    pub username: String,
    pub detail: Option<String>,
    pub logged_utc: DateTime<Utc>,
}
