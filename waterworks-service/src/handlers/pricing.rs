//! Pricing configuration.

use axum::{extract::State, Json};
use chrono::Utc;
use service_core::error::AppError;

use crate::dtos::{PricingResponse, UpdatePricingRequest};
use crate::models::{CreatePricing, UpdatePricing};
use crate::AppState;

pub async fn get_pricing(State(state): State<AppState>) -> Result<Json<PricingResponse>, AppError> {
    let pricing = state
        .db
        .get_pricing()
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No pricing configuration exists")))?;

    Ok(Json(PricingResponse::from(pricing)))
}

/// Create or update the pricing configuration.
///
/// The first call must supply every value. Later calls apply partial
/// updates and fail while invoices issued in the current calendar month
/// exist, since those froze the pricing that produced them.
pub async fn update_pricing(
    State(state): State<AppState>,
    Json(req): Json<UpdatePricingRequest>,
) -> Result<Json<PricingResponse>, AppError> {
    if !req.positive_values() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Pricing values must be positive"
        )));
    }

    let pricing = match state.db.get_pricing().await? {
        None => {
            let input = CreatePricing {
                base_allowance: require(req.base_allowance, "base_allowance")?,
                overage_unit: require(req.overage_unit, "overage_unit")?,
                base_price: require(req.base_price, "base_price")?,
                overage_unit_price: require(req.overage_unit_price, "overage_unit_price")?,
                reconnection_fee: require(req.reconnection_fee, "reconnection_fee")?,
            };
            state.db.create_pricing(&input).await?
        }
        Some(_) => {
            let input = UpdatePricing {
                base_allowance: req.base_allowance,
                overage_unit: req.overage_unit,
                base_price: req.base_price,
                overage_unit_price: req.overage_unit_price,
                reconnection_fee: req.reconnection_fee,
            };
            state.db.update_pricing(&input, Utc::now()).await?
        }
    };

    Ok(Json(PricingResponse::from(pricing)))
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "'{}' is required when creating the pricing configuration",
            field
        ))
    })
}
