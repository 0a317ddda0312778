//! Service connection management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

use crate::dtos::{
    CreateServiceRequest, ReassignServiceRequest, ServiceOverviewResponse, ServiceResponse,
    ServiceStatusRequest, UpdateServiceRequest,
};
use crate::middleware::CurrentAdmin;
use crate::models::{AuditCategory, CreateServiceConnection, UpdateServiceConnection};
use crate::utils::text::normalize_words;
use crate::utils::ValidatedJson;
use crate::AppState;

/// The full roster with owners and the billed-this-month flag.
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceOverviewResponse>>, AppError> {
    let services = state.db.list_services(Utc::now()).await?;
    Ok(Json(
        services
            .into_iter()
            .map(ServiceOverviewResponse::from)
            .collect(),
    ))
}

/// Services belonging to one client.
pub async fn list_for_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    state
        .db
        .get_client(client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

    let services = state.db.list_services_for_client(client_id).await?;
    Ok(Json(
        services.into_iter().map(ServiceResponse::from).collect(),
    ))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<ServiceResponse>, AppError> {
    let service = state
        .db
        .get_service(service_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service connection not found")))?;

    Ok(Json(ServiceResponse::from(service)))
}

pub async fn create_service(
    State(state): State<AppState>,
    current: CurrentAdmin,
    ValidatedJson(req): ValidatedJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    state
        .db
        .get_client(req.client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

    let input = CreateServiceConnection {
        client_id: req.client_id,
        connection_number: req.connection_number,
        meter_number: req.meter_number,
        address: normalize_words(&req.address),
        active: req.active,
        previous_reading: req.previous_reading,
    };

    let service = state.db.create_service(&input).await?;

    state
        .audit
        .record(
            AuditCategory::ServiceCreated,
            current.admin_id,
            Some(&format!("connection {}", service.connection_number)),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ServiceResponse::from(service))))
}

/// Partial update; absent fields keep their stored value.
pub async fn update_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    let input = UpdateServiceConnection {
        connection_number: req.connection_number,
        meter_number: req.meter_number,
        address: req.address.as_deref().map(normalize_words),
    };

    let service = state
        .db
        .update_service(service_id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service connection not found")))?;

    Ok(Json(ServiceResponse::from(service)))
}

/// Move the connection to another client.
pub async fn reassign_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    Json(req): Json<ReassignServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    state
        .db
        .get_client(req.client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

    let service = state
        .db
        .reassign_service(service_id, req.client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service connection not found")))?;

    Ok(Json(ServiceResponse::from(service)))
}

/// Activate or suspend the connection.
pub async fn set_service_status(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    Json(req): Json<ServiceStatusRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    let service = state
        .db
        .set_service_status(service_id, req.active)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service connection not found")))?;

    tracing::info!(service_id = %service_id, active = req.active, "Service status changed");

    Ok(Json(ServiceResponse::from(service)))
}

/// Delete a service connection along with its invoices and notifications.
pub async fn delete_service(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(service_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = state
        .db
        .get_service(service_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service connection not found")))?;

    state.db.delete_service(service_id).await?;

    state
        .audit
        .record(
            AuditCategory::ServiceDeleted,
            current.admin_id,
            Some(&format!("connection {}", service.connection_number)),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
