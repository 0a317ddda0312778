//! Admin account management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::dtos::{AdminResponse, CreateAdminRequest, MessageResponse, ResetPasswordRequest};
use crate::middleware::CurrentAdmin;
use crate::utils::{password, ValidatedJson};
use crate::AppState;

/// Every admin account except the superadmin.
pub async fn list_admins(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminResponse>>, AppError> {
    let admins = state.db.list_admins().await?;
    Ok(Json(admins.into_iter().map(AdminResponse::from).collect()))
}

pub async fn create_admin(
    State(state): State<AppState>,
    current: CurrentAdmin,
    ValidatedJson(req): ValidatedJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminResponse>), AppError> {
    let password_hash = password::hash_password(&req.password)?;
    let admin = state
        .db
        .create_admin(&req.username, &password_hash, false)
        .await?;

    tracing::info!(
        admin_id = %admin.admin_id,
        created_by = %current.username,
        "Admin account created"
    );

    Ok((StatusCode::CREATED, Json(AdminResponse::from(admin))))
}

/// Set a new password for another admin account.
pub async fn reset_password(
    State(state): State<AppState>,
    current: CurrentAdmin,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.admin_id == current.admin_id {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Cannot reset the password of the current session's account"
        )));
    }

    let target = state
        .db
        .get_admin(req.admin_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Admin not found")))?;

    if target.superadmin {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "The superadmin account cannot be modified"
        )));
    }

    let password_hash = password::hash_password(&req.new_password)?;
    state
        .db
        .set_admin_password(target.admin_id, &password_hash)
        .await?;

    tracing::info!(admin_id = %target.admin_id, reset_by = %current.username, "Password reset");

    Ok(Json(MessageResponse::new("Password reset")))
}

pub async fn delete_admin(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(admin_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let target = state
        .db
        .get_admin(admin_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Admin not found")))?;

    if target.superadmin {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "The superadmin account cannot be deleted"
        )));
    }

    state.db.delete_admin(admin_id).await?;

    tracing::info!(admin_id = %admin_id, deleted_by = %current.username, "Admin account deleted");

    Ok(StatusCode::NO_CONTENT)
}
