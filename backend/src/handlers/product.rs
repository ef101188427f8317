//! Product and stock HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::ledger::StockMovement;
use shared::{ListQuery, Listing, NewProduct, Product, ProductPatch};

use crate::error::AppResult;
use crate::services::{ProductService, StockLedger};
use crate::AppState;

/// Body of the stock endpoints
#[derive(Debug, Deserialize)]
pub struct StockQuantityInput {
    pub quantity: i32,
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let service = ProductService::new(state.db);
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// List products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Listing<Product>>> {
    let service = ProductService::new(state.db);
    Ok(Json(service.list(&query).await?.into()))
}

/// Get a product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    Ok(Json(service.get(&product_id).await?))
}

/// List the products of a category
pub async fn list_products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> AppResult<Json<Listing<Product>>> {
    let service = ProductService::new(state.db);
    Ok(Json(service.list_by_category(category_id).await?.into()))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    Ok(Json(service.update(&product_id, patch).await?))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<StatusCode> {
    let service = ProductService::new(state.db);
    service.delete(&product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set the stock to an absolute count
pub async fn set_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(input): Json<StockQuantityInput>,
) -> AppResult<Json<Product>> {
    let ledger = StockLedger::new(state.db);
    let movement = StockMovement::Set(input.quantity);
    Ok(Json(ledger.apply(&product_id, movement).await?))
}

/// Add units to stock (goods received)
pub async fn add_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(input): Json<StockQuantityInput>,
) -> AppResult<Json<Product>> {
    let ledger = StockLedger::new(state.db);
    let movement = StockMovement::In(input.quantity);
    Ok(Json(ledger.apply(&product_id, movement).await?))
}

/// Take units out of stock
pub async fn remove_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(input): Json<StockQuantityInput>,
) -> AppResult<Json<Product>> {
    let ledger = StockLedger::new(state.db);
    let movement = StockMovement::Out(input.quantity);
    Ok(Json(ledger.apply(&product_id, movement).await?))
}
