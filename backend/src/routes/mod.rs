//! Route definitions for the inventory backend

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/clients", client_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/sales", sale_routes())
        .nest("/purchases", purchase_routes())
        .nest("/checks", check_routes())
}

/// Server-rendered pages
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::dashboard_page))
        .route("/products", get(handlers::products_page))
        .route("/clients", get(handlers::clients_page))
        .route("/suppliers", get(handlers::suppliers_page))
        .route("/sales", get(handlers::sales_page))
        .route("/sales/:receipt_id", get(handlers::receipt_page))
}

/// Category routes
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
}

/// Product and stock routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/category/:category_id",
            get(handlers::list_products_by_category),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/stock", put(handlers::set_stock))
        .route("/:product_id/stock/add", post(handlers::add_stock))
        .route("/:product_id/stock/remove", post(handlers::remove_stock))
}

/// Client routes
fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_clients).post(handlers::create_client))
        .route("/email/:email", get(handlers::find_client_by_email))
        .route(
            "/:client_id",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .route("/:client_id/deactivate", post(handlers::deactivate_client))
        .route("/:client_id/activate", post(handlers::activate_client))
}

/// Supplier routes; DELETE archives
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route("/summary", get(handlers::list_supplier_summary))
        .route("/archived", get(handlers::list_archived_suppliers))
        .route("/archived/:nit/restore", post(handlers::restore_supplier))
        .route(
            "/:nit",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::archive_supplier),
        )
}

/// Sale routes
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route("/:receipt_id", get(handlers::get_sale_receipt))
}

/// Purchase routes
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchases).post(handlers::create_purchase),
        )
        .route("/:purchase_id", get(handlers::get_purchase))
}

/// Existence and availability checks
fn check_routes() -> Router<AppState> {
    Router::new()
        .route("/category/:category_id", get(handlers::check_category))
        .route("/product/:product_id", get(handlers::check_product))
        .route("/stock/:product_id", get(handlers::check_stock))
}
