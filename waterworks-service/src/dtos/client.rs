use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Client;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(equal = 10, message = "National id must be 10 digits"))]
    pub national_id: String,
    #[validate(length(min = 1, max = 100, message = "First names are required"))]
    pub first_names: String,
    #[validate(length(min = 1, max = 100, message = "Last names are required"))]
    pub last_names: String,
    #[validate(length(min = 8, max = 10, message = "Phone must be 8 to 10 digits"))]
    pub phone: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateClientRequest {
    #[validate(length(equal = 10, message = "National id must be 10 digits"))]
    pub national_id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "First names must not be empty"))]
    pub first_names: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last names must not be empty"))]
    pub last_names: Option<String>,
    #[validate(length(min = 8, max = 10, message = "Phone must be 8 to 10 digits"))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub client_id: Uuid,
    pub national_id: String,
    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            client_id: client.client_id,
            national_id: client.national_id,
            first_names: client.first_names,
            last_names: client.last_names,
            phone: client.phone,
            created_utc: client.created_utc,
        }
    }
}

/// Client fields embedded in joined responses.
#[derive(Debug, Serialize)]
pub struct ClientSummary {
    pub client_id: Uuid,
    pub national_id: String,
    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
}
