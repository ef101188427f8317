//! Supplier HTTP handlers
//!
//! `DELETE /suppliers/:nit` archives; there is no permanent delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{
    ListQuery, Listing, NewSupplier, Supplier, SupplierBackup, SupplierPatch, SupplierSummary,
};

use crate::error::AppResult;
use crate::services::SupplierService;
use crate::AppState;

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<NewSupplier>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let service = SupplierService::new(state.db);
    let supplier = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// List active suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Listing<Supplier>>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.list(&query).await?.into()))
}

/// Nit, name and contact of every active supplier
pub async fn list_supplier_summary(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SupplierSummary>>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.list_summary().await?))
}

/// Get an active supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(nit): Path<String>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.get(&nit).await?))
}

/// Update an active supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(nit): Path<String>,
    Json(patch): Json<SupplierPatch>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.update(&nit, patch).await?))
}

/// Archive an active supplier
pub async fn archive_supplier(
    State(state): State<AppState>,
    Path(nit): Path<String>,
) -> AppResult<Json<SupplierBackup>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.archive(&nit).await?))
}

/// List archived suppliers
pub async fn list_archived_suppliers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Listing<SupplierBackup>>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.list_archived(&query).await?.into()))
}

/// Restore an archived supplier
pub async fn restore_supplier(
    State(state): State<AppState>,
    Path(nit): Path<String>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.restore(&nit).await?))
}
