//! Payment notifications.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::dtos::{DeletedCountResponse, NotificationDetailResponse, NotificationResponse};
use crate::middleware::CurrentAdmin;
use crate::models::AuditCategory;
use crate::AppState;

pub async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<NotificationDetailResponse>>, AppError> {
    let notifications = state.db.list_notifications(None).await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationDetailResponse::from)
            .collect(),
    ))
}

pub async fn list_for_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Vec<NotificationDetailResponse>>, AppError> {
    let notifications = state.db.list_notifications(Some(service_id)).await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationDetailResponse::from)
            .collect(),
    ))
}

/// Post a notice against a service, at the flat default amount.
pub async fn create_notification(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(service_id): Path<Uuid>,
) -> Result<(StatusCode, Json<NotificationResponse>), AppError> {
    state
        .db
        .get_service(service_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service connection not found")))?;

    let notification = state.db.create_notification(service_id).await?;

    state
        .audit
        .record(AuditCategory::NotificationCreated, current.admin_id, None)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NotificationResponse::from(notification)),
    ))
}

/// Flip the paid flag; settling is audited.
pub async fn toggle_paid(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, AppError> {
    let notification = state
        .db
        .toggle_notification_paid(notification_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Notification not found")))?;

    if notification.paid {
        state
            .audit
            .record(AuditCategory::NotificationSettled, current.admin_id, None)
            .await?;
    }

    Ok(Json(NotificationResponse::from(notification)))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.db.delete_notification(notification_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Notification not found")));
    }

    state
        .audit
        .record(AuditCategory::NotificationDeleted, current.admin_id, None)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete every settled notification.
pub async fn delete_settled(
    State(state): State<AppState>,
    current: CurrentAdmin,
) -> Result<Json<DeletedCountResponse>, AppError> {
    let deleted = state.db.delete_settled_notifications(None).await?;

    state
        .audit
        .record(
            AuditCategory::NotificationDeleted,
            current.admin_id,
            Some(&format!("{} settled", deleted)),
        )
        .await?;

    Ok(Json(DeletedCountResponse { deleted }))
}

/// Delete one service's settled notifications.
pub async fn delete_settled_for_service(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(service_id): Path<Uuid>,
) -> Result<Json<DeletedCountResponse>, AppError> {
    let deleted = state
        .db
        .delete_settled_notifications(Some(service_id))
        .await?;

    state
        .audit
        .record(
            AuditCategory::NotificationDeleted,
            current.admin_id,
            Some(&format!("{} settled", deleted)),
        )
        .await?;

    Ok(Json(DeletedCountResponse { deleted }))
}
