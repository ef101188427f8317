//! Sale transaction processor
//!
//! A sale validates the whole basket before touching stock:
//!
//! 1. resolve the client,
//! 2. lock every product in the basket (ascending id order),
//! 3. plan all lines against the locked rows,
//! 4. decrement each line, in input order,
//! 5. commit, then write the text receipt.
//!
//! Steps 1-4 share one transaction, so a rejected basket leaves every
//! product's stock as it was. The receipt is written only after commit;
//! if that write fails the caller gets `ReceiptWriteFailed`, which says the
//! sale itself went through.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use shared::{Basket, Client, PlannedLine, Product, Receipt, ReceiptSummary};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::ReceiptStore;
use crate::services::StockLedger;

/// Sale service
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
    receipts: ReceiptStore,
}

/// What a completed sale hands back for the confirmation view
#[derive(Debug, Clone, Serialize)]
pub struct SaleConfirmation {
    pub receipt_id: String,
    pub client_id: i32,
    pub client_name: String,
    pub lines: Vec<PlannedLine>,
    pub total: rust_decimal::Decimal,
    pub receipt_path: String,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool, receipts: ReceiptStore) -> Self {
        Self { db, receipts }
    }

    /// Process a basket as one all-or-nothing sale
    pub async fn process_sale(&self, basket: Basket) -> AppResult<SaleConfirmation> {
        let mut tx = self.db.begin().await?;

        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, phone, email, active FROM clients WHERE id = $1 FOR SHARE",
        )
        .bind(basket.client_id())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))?;

        if !client.active {
            return Err(AppError::validation(
                "client_id",
                "The client is inactive",
                "El cliente está inactivo",
            ));
        }

        let product_ids = basket.product_ids();
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock, category_id
            FROM products
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await?;

        let catalog: HashMap<String, Product> =
            products.into_iter().map(|p| (p.id.clone(), p)).collect();

        let plan = basket.plan(&catalog)?;

        for line in &plan.lines {
            StockLedger::decrement_in(&mut tx, &line.product_id, line.quantity).await?;
        }

        tx.commit().await?;

        tracing::info!(
            client_id = client.id,
            lines = plan.lines.len(),
            units = plan.units(),
            total = %plan.total,
            "Sale committed"
        );

        let receipt = Receipt::new(client.id, &client.name, &plan, Utc::now(), Uuid::new_v4());
        let path = self
            .receipts
            .write(&receipt.id, &receipt.render())
            .await
            .map_err(|e| {
                tracing::error!(receipt_id = %receipt.id, "Sale committed but receipt write failed: {}", e);
                AppError::ReceiptWriteFailed {
                    receipt_id: receipt.id.clone(),
                    message: e.to_string(),
                }
            })?;

        Ok(SaleConfirmation {
            receipt_id: receipt.id,
            client_id: client.id,
            client_name: client.name,
            lines: receipt.lines,
            total: receipt.total,
            receipt_path: path.display().to_string(),
        })
    }

    /// Sale history, newest first
    pub async fn list_receipts(&self) -> AppResult<Vec<ReceiptSummary>> {
        Ok(self.receipts.list().await?)
    }

    /// Text of one receipt
    pub async fn get_receipt(&self, receipt_id: &str) -> AppResult<String> {
        Ok(self.receipts.read(receipt_id).await?)
    }
}
