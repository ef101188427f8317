//! Sale HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{Basket, ReceiptSummary};

use crate::error::AppResult;
use crate::services::{SaleConfirmation, SaleService};
use crate::AppState;

/// A sale as the form submits it: two parallel arrays
#[derive(Debug, Deserialize)]
pub struct SaleRequest {
    pub client_id: i32,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub quantities: Vec<i32>,
}

/// Process a basket
pub async fn create_sale(
    State(state): State<AppState>,
    Json(request): Json<SaleRequest>,
) -> AppResult<(StatusCode, Json<SaleConfirmation>)> {
    let basket = Basket::from_parallel(request.client_id, request.product_ids, request.quantities)?;

    let service = SaleService::new(state.db, state.receipts);
    let confirmation = service.process_sale(basket).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// Receipt history, newest first
pub async fn list_sales(State(state): State<AppState>) -> AppResult<Json<Vec<ReceiptSummary>>> {
    let service = SaleService::new(state.db, state.receipts);
    Ok(Json(service.list_receipts().await?))
}

/// Receipt text
pub async fn get_sale_receipt(
    State(state): State<AppState>,
    Path(receipt_id): Path<String>,
) -> AppResult<String> {
    let service = SaleService::new(state.db, state.receipts);
    service.get_receipt(&receipt_id).await
}
