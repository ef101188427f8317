//! Category HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{Category, CategoryPatch, ListQuery, Listing, NewCategory};

use crate::error::AppResult;
use crate::services::CategoryService;
use crate::AppState;

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let service = CategoryService::new(state.db);
    let category = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List categories
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Listing<Category>>> {
    let service = CategoryService::new(state.db);
    let categories = service.list(&query).await?;
    Ok(Json(categories.into()))
}

/// Get a category
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    Ok(Json(service.get(category_id).await?))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
    Json(patch): Json<CategoryPatch>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    Ok(Json(service.update(category_id, patch).await?))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> AppResult<StatusCode> {
    let service = CategoryService::new(state.db);
    service.delete(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
