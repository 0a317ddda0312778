//! Invoice issuance, revision, and lifecycle.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

use crate::dtos::{
    InvoiceDetailResponse, InvoiceResponse, IssueInvoiceRequest, ReviseReadingRequest,
    SetInvoicePaidRequest,
};
use crate::middleware::CurrentAdmin;
use crate::models::AuditCategory;
use crate::utils::ValidatedJson;
use crate::AppState;

/// Every invoice issued for one service, newest first.
pub async fn list_for_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    state
        .db
        .get_service(service_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service connection not found")))?;

    let invoices = state.db.list_invoices_for_service(service_id).await?;
    Ok(Json(
        invoices.into_iter().map(InvoiceResponse::from).collect(),
    ))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceDetailResponse>, AppError> {
    let invoice = state
        .db
        .get_invoice_with_parties(invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    Ok(Json(InvoiceDetailResponse::from(invoice)))
}

/// All unpaid invoices with their service and client.
pub async fn list_pending(
    State(state): State<AppState>,
) -> Result<Json<Vec<InvoiceDetailResponse>>, AppError> {
    let invoices = state.db.list_pending_invoices().await?;
    Ok(Json(
        invoices
            .into_iter()
            .map(InvoiceDetailResponse::from)
            .collect(),
    ))
}

/// Issue the monthly invoice for a service from a new meter reading.
pub async fn issue_invoice(
    State(state): State<AppState>,
    current: CurrentAdmin,
    ValidatedJson(req): ValidatedJson<IssueInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    let invoice = state
        .db
        .issue_invoice(req.service_id, req.current_reading, Utc::now())
        .await?;

    state
        .audit
        .record(
            AuditCategory::InvoiceIssued,
            current.admin_id,
            Some(&invoice.invoice_id.to_string()),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

/// Mark the invoice paid or unpaid.
pub async fn set_paid(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(req): Json<SetInvoicePaidRequest>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = state
        .db
        .set_invoice_paid(invoice_id, req.paid)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    tracing::info!(invoice_id = %invoice_id, paid = req.paid, "Invoice payment state changed");

    Ok(Json(InvoiceResponse::from(invoice)))
}

/// Correct the current reading of an unpaid, current-month invoice.
pub async fn revise_reading(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ReviseReadingRequest>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = state
        .db
        .revise_invoice_reading(invoice_id, req.current_reading, Utc::now())
        .await?;

    Ok(Json(InvoiceResponse::from(invoice)))
}

/// Delete a past-month invoice, rolling the service's reading back.
pub async fn delete_invoice(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(invoice_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let invoice = state.db.delete_invoice(invoice_id, Utc::now()).await?;

    state
        .audit
        .record(
            AuditCategory::InvoiceDeleted,
            current.admin_id,
            Some(&invoice.invoice_id.to_string()),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
