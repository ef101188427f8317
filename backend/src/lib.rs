//! Inventory management backend
//!
//! Categories, products, clients, suppliers, sales and purchases over a
//! PostgreSQL database, with JSON endpoints under `/api/v1` and
//! server-rendered pages for the day-to-day views.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use external::ReceiptStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub receipts: ReceiptStore,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, config: Config) -> Self {
        let receipts = ReceiptStore::new(config.receipts.directory.clone());
        Self {
            db,
            config: Arc::new(config),
            receipts,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        .merge(routes::page_routes())
        .route("/health", get(liveness))
        .nest("/api/v1", routes::api_routes())
        .nest_service("/static", static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness probe; `/api/v1/health` also checks the database
async fn liveness() -> &'static str {
    "OK"
}
