use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A utility client; owner of one or more service connections.
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub client_id: Uuid,
    pub national_id: String,
    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Input for registering a client. Names arrive already normalized.
#[derive(Debug, Clone)]
pub struct CreateClient {
    pub national_id: String,
    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateClient {
    pub national_id: Option<String>,
    pub first_names: Option<String>,
    pub last_names: Option<String>,
    pub phone: Option<String>,
}
