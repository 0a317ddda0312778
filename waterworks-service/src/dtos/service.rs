use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::ClientSummary;
use crate::models::{ServiceConnection, ServiceOverview};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequest {
    pub client_id: Uuid,
    #[validate(range(min = 1, message = "Connection number must be positive"))]
    pub connection_number: i64,
    #[validate(range(min = 1, message = "Meter number must be positive"))]
    pub meter_number: i64,
    #[validate(length(min = 1, max = 250, message = "Address is required"))]
    pub address: String,
    pub active: bool,
    #[validate(range(min = 0, message = "Previous reading must not be negative"))]
    pub previous_reading: i64,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateServiceRequest {
    #[validate(range(min = 1, message = "Connection number must be positive"))]
    pub connection_number: Option<i64>,
    #[validate(range(min = 1, message = "Meter number must be positive"))]
    pub meter_number: Option<i64>,
    #[validate(length(min = 1, max = 250, message = "Address must not be empty"))]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReassignServiceRequest {
    pub client_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ServiceStatusRequest {
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub connection_number: i64,
    pub meter_number: i64,
    pub address: String,
    pub active: bool,
    pub previous_reading: i64,
}

impl From<ServiceConnection> for ServiceResponse {
    fn from(service: ServiceConnection) -> Self {
        Self {
            service_id: service.service_id,
            client_id: service.client_id,
            connection_number: service.connection_number,
            meter_number: service.meter_number,
            address: service.address,
            active: service.active,
            previous_reading: service.previous_reading,
        }
    }
}

/// Service fields embedded in joined responses.
#[derive(Debug, Serialize)]
pub struct ServiceSummary {
    pub service_id: Uuid,
    pub connection_number: i64,
    pub meter_number: i64,
    pub address: String,
    pub active: bool,
    pub previous_reading: i64,
}

/// One roster row: the service, its owner, and the billed-this-month flag.
#[derive(Debug, Serialize)]
pub struct ServiceOverviewResponse {
    pub service_id: Uuid,
    pub connection_number: i64,
    pub meter_number: i64,
    pub address: String,
    pub active: bool,
    pub previous_reading: i64,
    pub current_period_billed: bool,
    pub client: ClientSummary,
}

impl From<ServiceOverview> for ServiceOverviewResponse {
    fn from(row: ServiceOverview) -> Self {
        Self {
            service_id: row.service_id,
            connection_number: row.connection_number,
            meter_number: row.meter_number,
            address: row.address,
            active: row.active,
            previous_reading: row.previous_reading,
            current_period_billed: row.current_period_billed,
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
