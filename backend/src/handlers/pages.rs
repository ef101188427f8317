//! Server-rendered pages

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use shared::{
    Client, ListQuery, Product, ReceiptSummary, Supplier, SupplierBackup, STORE_NAME,
};

use crate::error::AppResult;
use crate::services::product::LOW_STOCK_THRESHOLD;
use crate::services::{ClientService, ProductService, SaleService, SupplierService};
use crate::AppState;

/// Receipts shown on the dashboard
const RECENT_SALES: usize = 10;

/// Receipt row for the history tables
pub struct ReceiptRow {
    pub id: String,
    pub issued_at: String,
    pub client_id: i32,
}

impl From<ReceiptSummary> for ReceiptRow {
    fn from(summary: ReceiptSummary) -> Self {
        Self {
            issued_at: summary.issued_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            id: summary.id,
            client_id: summary.client_id,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct DashboardTemplate {
    pub store_name: &'static str,
    pub product_count: i64,
    pub client_count: i64,
    pub supplier_count: i64,
    pub archived_supplier_count: i64,
    pub low_stock: Vec<Product>,
    pub low_stock_threshold: i32,
    pub recent_sales: Vec<ReceiptRow>,
}

#[derive(Template)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub store_name: &'static str,
    pub products: Vec<Product>,
    pub low_stock_threshold: i32,
}

#[derive(Template)]
#[template(path = "clients.html")]
pub struct ClientsTemplate {
    pub store_name: &'static str,
    pub clients: Vec<Client>,
}

#[derive(Template)]
#[template(path = "suppliers.html")]
pub struct SuppliersTemplate {
    pub store_name: &'static str,
    pub active: Vec<Supplier>,
    pub archived: Vec<SupplierBackup>,
}

#[derive(Template)]
#[template(path = "sales.html")]
pub struct SalesTemplate {
    pub store_name: &'static str,
    pub receipts: Vec<ReceiptRow>,
}

#[derive(Template)]
#[template(path = "receipt.html")]
pub struct ReceiptTemplate {
    pub store_name: &'static str,
    pub receipt_id: String,
    pub text: String,
}

pub async fn dashboard_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let products = ProductService::new(state.db.clone());
    let (supplier_count, archived_supplier_count) =
        SupplierService::new(state.db.clone()).counts().await?;
    let sales = SaleService::new(state.db.clone(), state.receipts.clone());

    let template = DashboardTemplate {
        store_name: STORE_NAME,
        product_count: products.count().await?,
        client_count: ClientService::new(state.db).count().await?,
        supplier_count,
        archived_supplier_count,
        low_stock: products.low_stock().await?,
        low_stock_threshold: LOW_STOCK_THRESHOLD,
        recent_sales: sales
            .list_receipts()
            .await?
            .into_iter()
            .take(RECENT_SALES)
            .map(ReceiptRow::from)
            .collect(),
    };

    Ok(Html(template.render()?))
}

pub async fn products_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let products = ProductService::new(state.db)
        .list(&ListQuery::default())
        .await?;

    let template = ProductsTemplate {
        store_name: STORE_NAME,
        products,
        low_stock_threshold: LOW_STOCK_THRESHOLD,
    };
    Ok(Html(template.render()?))
}

pub async fn clients_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let clients = ClientService::new(state.db)
        .list(&ListQuery::default())
        .await?;

    let template = ClientsTemplate {
        store_name: STORE_NAME,
        clients,
    };
    Ok(Html(template.render()?))
}

pub async fn suppliers_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let service = SupplierService::new(state.db);
    let query = ListQuery::default();

    let template = SuppliersTemplate {
        store_name: STORE_NAME,
        active: service.list(&query).await?,
        archived: service.list_archived(&query).await?,
    };
    Ok(Html(template.render()?))
}

pub async fn sales_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let receipts = SaleService::new(state.db, state.receipts)
        .list_receipts()
        .await?;

    let template = SalesTemplate {
        store_name: STORE_NAME,
        receipts: receipts.into_iter().map(ReceiptRow::from).collect(),
    };
    Ok(Html(template.render()?))
}

pub async fn receipt_page(
    State(state): State<AppState>,
    Path(receipt_id): Path<String>,
) -> AppResult<Html<String>> {
    let text = SaleService::new(state.db, state.receipts)
        .get_receipt(&receipt_id)
        .await?;

    let template = ReceiptTemplate {
        store_name: STORE_NAME,
        receipt_id,
        text,
    };
    Ok(Html(template.render()?))
}
