//! Dashboard statistics.

use axum::{extract::State, Json};
use chrono::{Datelike, Duration, NaiveTime, Utc};
use service_core::error::AppError;

use crate::dtos::{ConnectionRevenueResponse, EntityCountsResponse, InvoiceRevenueResponse};
use crate::models::PaymentKind;
use crate::AppState;

pub async fn entity_counts(
    State(state): State<AppState>,
) -> Result<Json<EntityCountsResponse>, AppError> {
    let (clients, services, unpaid_invoices) = state.db.entity_counts().await?;
    Ok(Json(EntityCountsResponse {
        clients,
        services,
        unpaid_invoices,
    }))
}

/// Invoice totals per weekday of the current ISO week and per month of the
/// current year.
pub async fn invoice_revenue(
    State(state): State<AppState>,
) -> Result<Json<InvoiceRevenueResponse>, AppError> {
    let now = Utc::now();
    let today = now.date_naive();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let week_start = monday.and_time(NaiveTime::MIN).and_utc();
    let week_end = week_start + Duration::days(7);

    let weekdays = state
        .db
        .invoice_revenue_by_weekday(week_start, week_end)
        .await?;
    let months = state.db.invoice_revenue_by_month(now.year()).await?;

    Ok(Json(InvoiceRevenueResponse {
        weekdays: weekdays.to_vec(),
        months: months.to_vec(),
    }))
}

/// Collected connection-fee totals per month of the current year, one
/// series per payment kind.
pub async fn connection_revenue(
    State(state): State<AppState>,
) -> Result<Json<ConnectionRevenueResponse>, AppError> {
    let year = Utc::now().year();

    let upfront = state
        .db
        .connection_revenue_by_month(PaymentKind::Upfront, year)
        .await?;
    let financed = state
        .db
        .connection_revenue_by_month(PaymentKind::Financed, year)
        .await?;
    let reconnection = state
        .db
        .connection_revenue_by_month(PaymentKind::Reconnection, year)
        .await?;

    Ok(Json(ConnectionRevenueResponse {
        upfront: upfront.to_vec(),
        financed: financed.to_vec(),
        reconnection: reconnection.to_vec(),
    }))
}
