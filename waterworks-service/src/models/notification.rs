use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// A payment notice posted against one service connection.
#[derive(Debug, Clone, FromRow)]
pub struct Notification {
    pub notification_id: Uuid,
    pub service_id: Uuid,
    pub issued_utc: DateTime<Utc>,
    pub amount: Decimal,
    pub paid: bool,
}

/// A notification joined with its service connection and owning client.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationWithParties {
    pub notification_id: Uuid,
    pub service_id: Uuid,
    pub issued_utc: DateTime<Utc>,
    pub amount: Decimal,
    pub paid: bool,
    pub connection_number: i64,
    pub meter_number: i64,
    pub client_id: Uuid,
    pub national_id: String,
    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
}
