use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::AuditEntry;

#[derive(Debug, Serialize)]
pub struct AuditEntryResponse {
    pub log_id: Uuid,
    pub category: String,
    pub username: String,
    pub detail: Option<String>,
    pub logged_utc: DateTime<Utc>,
}

impl From<AuditEntry> for AuditEntryResponse {
    fn from(entry: AuditEntry) -> Self {
        Self {
            log_id: entry.log_id,
            category: entry.category,
            username: entry.username,
            detail: entry.detail,
            logged_utc: entry.logged_utc,
        }
    }
}
