//! Price alert route handlers.
//!
//! Alerts are scoped to the authenticated user: one alert per (user,
//! product), and only the owner can update or delete it.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use rust_decimal::Decimal;

use basketwatch_core::{PriceAlertId, UserId};

use crate::db::PriceAlertRepository;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::price_alert::{CreatePriceAlertInput, PriceAlert, UpdatePriceAlertInput};
use crate::state::AppState;

/// Build the price alert router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/price-alerts", get(list_alerts).post(create_alert))
        .route("/price-alerts/{id}", put(update_alert).delete(delete_alert))
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Create a price alert for the caller.
///
/// POST /price-alerts
async fn create_alert(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<CreatePriceAlertInput>,
) -> Result<(StatusCode, Json<PriceAlert>), ApiError> {
    validate_target_price(input.target_price)?;

    let alert = PriceAlertRepository::new(state.pool())
        .create(user_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(alert)))
}

/// The caller's price alerts, newest first.
///
/// GET /price-alerts
async fn list_alerts(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<PriceAlert>>, ApiError> {
    let alerts = PriceAlertRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(alerts))
}

/// Update the caller's price alert.
///
/// PUT /price-alerts/{id}
async fn update_alert(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdatePriceAlertInput>,
) -> Result<Json<PriceAlert>, ApiError> {
    if let Some(target_price) = input.target_price {
        validate_target_price(target_price)?;
    }

    let id = PriceAlertId::new(id);
    owned_alert(&state, user_id, id).await?;

    let alert = PriceAlertRepository::new(state.pool())
        .update(id, &input)
        .await?;

    Ok(Json(alert))
}

/// Delete the caller's price alert.
///
/// DELETE /price-alerts/{id}
async fn delete_alert(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = PriceAlertId::new(id);
    owned_alert(&state, user_id, id).await?;

    PriceAlertRepository::new(state.pool()).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

/// Validate an alert target price: strictly positive.
fn validate_target_price(target_price: Decimal) -> Result<(), ApiError> {
    if target_price <= Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "target_price must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// 404 unless the alert exists, 403 unless the caller owns it.
async fn owned_alert(state: &AppState, user_id: UserId, id: PriceAlertId) -> Result<(), ApiError> {
    let alert = PriceAlertRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("price alert not found".to_string()))?;
    if alert.user_id != user_id {
        return Err(ApiError::Forbidden(
            "you do not own this price alert".to_string(),
        ));
    }
    Ok(())
}
