//! Purchase HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{ListQuery, Listing, NewPurchase, Purchase, PurchaseWithLines};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::PurchaseService;
use crate::AppState;

/// Record a purchase and take its lines into stock
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<NewPurchase>,
) -> AppResult<(StatusCode, Json<PurchaseWithLines>)> {
    let service = PurchaseService::new(state.db);
    let purchase = service.record(input).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// List purchases
pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Listing<Purchase>>> {
    let service = PurchaseService::new(state.db);
    Ok(Json(service.list(&query).await?.into()))
}

/// Get a purchase with its lines
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<PurchaseWithLines>> {
    let service = PurchaseService::new(state.db);
    Ok(Json(service.get(purchase_id).await?))
}
