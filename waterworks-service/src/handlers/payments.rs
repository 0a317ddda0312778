//! Connection-fee payment tracking.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use uuid::Uuid;

use crate::dtos::{
    CreatePaymentRequest, InstallmentsRequest, PaymentDetailResponse, PaymentResponse,
};
use crate::models::{CreateConnectionPayment, PaymentKind};
use crate::utils::ValidatedJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentsQuery {
    pub kind: String,
}

fn parse_kind(kind: &str) -> Result<PaymentKind, AppError> {
    PaymentKind::parse(kind)
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Unknown payment kind '{}'", kind)))
}

/// Payments of one kind with their service and client.
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentsQuery>,
) -> Result<Json<Vec<PaymentDetailResponse>>, AppError> {
    let kind = parse_kind(&query.kind)?;
    let payments = state.db.list_payments(kind).await?;
    Ok(Json(
        payments
            .into_iter()
            .map(PaymentDetailResponse::from)
            .collect(),
    ))
}

/// Record a connection, financing, or reconnection payment.
///
/// A reconnection payment takes its total from the configured reconnection
/// fee unless one is given explicitly.
pub async fn create_payment(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    let kind = parse_kind(&req.kind)?;

    state
        .db
        .get_service(req.service_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service connection not found")))?;

    let total = match (req.total, kind) {
        (Some(total), _) => total,
        (None, PaymentKind::Reconnection) => {
            let pricing = state.db.get_pricing().await?.ok_or_else(|| {
                AppError::BadRequest(anyhow::anyhow!(
                    "No pricing configuration exists to default the reconnection fee"
                ))
            })?;
            pricing.reconnection_fee
        }
        (None, _) => {
            return Err(AppError::BadRequest(anyhow::anyhow!("Total is required")));
        }
    };

    let input = CreateConnectionPayment {
        service_id: req.service_id,
        kind,
        total,
        down_payment: req.down_payment,
    };

    let payment = state.db.create_payment(&input).await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// Overwrite the six installments of a financed payment.
pub async fn update_installments(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    Json(req): Json<InstallmentsRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment = state
        .db
        .update_installments(payment_id, req.to_array())
        .await?;

    Ok(Json(PaymentResponse::from(payment)))
}

/// Delete a payment record; a financed payment must be fully paid first.
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.db.delete_payment(payment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
