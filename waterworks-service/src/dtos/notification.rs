use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::dtos::ClientSummary;
use crate::models::{Notification, NotificationWithParties};

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub notification_id: Uuid,
    pub service_id: Uuid,
    pub issued_utc: DateTime<Utc>,
    pub amount: Decimal,
    pub paid: bool,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            notification_id: notification.notification_id,
            service_id: notification.service_id,
            issued_utc: notification.issued_utc,
            amount: notification.amount,
            paid: notification.paid,
        }
    }
}

/// A notification with its service connection and owning client.
#[derive(Debug, Serialize)]
pub struct NotificationDetailResponse {
    pub notification_id: Uuid,
    pub service_id: Uuid,
    pub connection_number: i64,
    pub meter_number: i64,
    pub issued_utc: DateTime<Utc>,
    pub amount: Decimal,
    pub paid: bool,
    pub client: ClientSummary,
}

impl From<NotificationWithParties> for NotificationDetailResponse {
    fn from(row: NotificationWithParties) -> Self {
        Self {
            notification_id: row.notification_id,
            service_id: row.service_id,
            connection_number: row.connection_number,
            meter_number: row.meter_number,
            issued_utc: row.issued_utc,
            amount: row.amount,
            paid: row.paid,
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
