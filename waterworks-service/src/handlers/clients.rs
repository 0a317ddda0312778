//! Client management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::dtos::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::middleware::CurrentAdmin;
use crate::models::{AuditCategory, CreateClient, UpdateClient};
use crate::utils::text::{is_digits, normalize_words};
use crate::utils::ValidatedJson;
use crate::AppState;

pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    let clients = state.db.list_clients().await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ClientResponse>, AppError> {
    let client = state
        .db
        .get_client(client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

    Ok(Json(ClientResponse::from(client)))
}

pub async fn create_client(
    State(state): State<AppState>,
    current: CurrentAdmin,
    ValidatedJson(req): ValidatedJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    check_digit_fields(Some(&req.national_id), req.phone.as_deref())?;

    let input = CreateClient {
        national_id: req.national_id,
        first_names: normalize_words(&req.first_names),
        last_names: normalize_words(&req.last_names),
        phone: req.phone,
    };

    let client = state.db.create_client(&input).await?;

    state
        .audit
        .record(
            AuditCategory::ClientCreated,
            current.admin_id,
            Some(&client.national_id),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

/// Partial update; absent fields keep their stored value.
pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    check_digit_fields(req.national_id.as_deref(), req.phone.as_deref())?;

    let input = UpdateClient {
        national_id: req.national_id,
        first_names: req.first_names.as_deref().map(normalize_words),
        last_names: req.last_names.as_deref().map(normalize_words),
        phone: req.phone,
    };

    let client = state
        .db
        .update_client(client_id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

    Ok(Json(ClientResponse::from(client)))
}

/// Delete a client along with their services and invoices.
pub async fn delete_client(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(client_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let client = state
        .db
        .get_client(client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

    state.db.delete_client(client_id).await?;

    state
        .audit
        .record(
            AuditCategory::ClientDeleted,
            current.admin_id,
            Some(&client.national_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn check_digit_fields(national_id: Option<&str>, phone: Option<&str>) -> Result<(), AppError> {
    if let Some(national_id) = national_id {
        if !is_digits(national_id) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "National id must contain digits only"
            )));
        }
    }
    if let Some(phone) = phone {
        if !is_digits(phone) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Phone must contain digits only"
            )));
        }
    }
    Ok(())
}
