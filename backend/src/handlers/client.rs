//! Client HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{Client, ClientPatch, ListQuery, Listing, NewClient};

use crate::error::{AppError, AppResult};
use crate::services::ClientService;
use crate::AppState;

/// Create a client
pub async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<NewClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let service = ClientService::new(state.db);
    let client = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// List clients
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Listing<Client>>> {
    let service = ClientService::new(state.db);
    Ok(Json(service.list(&query).await?.into()))
}

/// Get a client
pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> AppResult<Json<Client>> {
    let service = ClientService::new(state.db);
    Ok(Json(service.get(client_id).await?))
}

/// Find a client by email
pub async fn find_client_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Client>> {
    let service = ClientService::new(state.db);
    service
        .find_by_email(&email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Client".to_string()))
}

/// Update a client
pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
    Json(patch): Json<ClientPatch>,
) -> AppResult<Json<Client>> {
    let service = ClientService::new(state.db);
    Ok(Json(service.update(client_id, patch).await?))
}

/// Deactivate a client
pub async fn deactivate_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> AppResult<Json<Client>> {
    let service = ClientService::new(state.db);
    Ok(Json(service.set_active(client_id, false).await?))
}

/// Reactivate a client
pub async fn activate_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> AppResult<Json<Client>> {
    let service = ClientService::new(state.db);
    Ok(Json(service.set_active(client_id, true).await?))
}

/// Delete a client
pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> AppResult<StatusCode> {
    let service = ClientService::new(state.db);
    service.delete(client_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
