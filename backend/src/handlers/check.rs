//! Existence and availability checks used by the sale form

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::services::{CategoryService, ProductService, StockLedger};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Deserialize)]
pub struct StockCheckQuery {
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct StockCheckResponse {
    pub product_id: String,
    pub quantity: i32,
    pub available: bool,
}

pub async fn check_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> AppResult<Json<ExistsResponse>> {
    let exists = CategoryService::new(state.db).exists(category_id).await?;
    Ok(Json(ExistsResponse { exists }))
}

pub async fn check_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ExistsResponse>> {
    let exists = ProductService::new(state.db).exists(&product_id).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// Whether `quantity` units of a product could be sold right now
pub async fn check_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(query): Query<StockCheckQuery>,
) -> AppResult<Json<StockCheckResponse>> {
    let available = StockLedger::new(state.db)
        .check_available(&product_id, query.quantity)
        .await?;

    Ok(Json(StockCheckResponse {
        product_id,
        quantity: query.quantity,
        available,
    }))
}
