//! Audit log access.

use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::dtos::{AuditEntryResponse, DeletedCountResponse};
use crate::AppState;

/// Every audit entry with the acting admin's username, newest first.
pub async fn list_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuditEntryResponse>>, AppError> {
    let entries = state.audit.list().await?;
    Ok(Json(
        entries.into_iter().map(AuditEntryResponse::from).collect(),
    ))
}

/// Delete entries past the retention window.
pub async fn purge_stale(
    State(state): State<AppState>,
) -> Result<Json<DeletedCountResponse>, AppError> {
    let deleted = state.audit.purge_stale().await?;
    Ok(Json(DeletedCountResponse { deleted }))
}
