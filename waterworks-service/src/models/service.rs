use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A physical water connection/meter belonging to one client.
///
/// `previous_reading` is the last recorded meter reading; invoice issuance
/// advances it and keeps it monotonically non-decreasing.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceConnection {
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub connection_number: i64,
    pub meter_number: i64,
    pub address: String,
    pub active: bool,
    pub previous_reading: i64,
    pub created_utc: DateTime<Utc>,
}

/// One row of the service roster: the connection, its owner, and whether an
/// invoice has already been issued for the current calendar month.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceOverview {
    pub service_id: Uuid,
    pub connection_number: i64,
    pub meter_number: i64,
    pub address: String,
    pub active: bool,
    pub previous_reading: i64,
    pub client_id: Uuid,
    pub national_id: String,
    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
    pub current_period_billed: bool,
}

/// Input for installing a service connection. Address arrives normalized.
#[derive(Debug, Clone)]
pub struct CreateServiceConnection {
    pub client_id: Uuid,
    pub connection_number: i64,
    pub meter_number: i64,
    pub address: String,
    pub active: bool,
    pub previous_reading: i64,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateServiceConnection {
    pub connection_number: Option<i64>,
    pub meter_number: Option<i64>,
    pub address: Option<String>,
}
