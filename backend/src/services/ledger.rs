//! Stock ledger: every change to a product's stock goes through here
//!
//! The `*_in` functions run on a caller-supplied connection so that the
//! sale and purchase flows can group several movements in one transaction.
//! Decrements re-check availability inside the UPDATE itself, so stock
//! cannot go negative even if it moved after the caller validated it.

use shared::ledger::{self, StockMovement};
use shared::Product;
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, AppResult};

const PRODUCT_COLUMNS: &str = "id, name, price, stock, category_id";

/// Stock ledger over the products table
#[derive(Clone)]
pub struct StockLedger {
    db: PgPool,
}

impl StockLedger {
    /// Create a new StockLedger instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// True iff the product exists and has at least `quantity` units
    pub async fn check_available(&self, product_id: &str, quantity: i32) -> AppResult<bool> {
        let stock = sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(stock.map_or(false, |s| ledger::check_available(s, quantity)))
    }

    /// Take units out of stock
    pub async fn decrement(&self, product_id: &str, quantity: i32) -> AppResult<Product> {
        let mut conn = self.db.acquire().await?;
        Self::decrement_in(&mut conn, product_id, quantity).await
    }

    /// Add units to stock
    pub async fn increment(&self, product_id: &str, quantity: i32) -> AppResult<Product> {
        let mut conn = self.db.acquire().await?;
        Self::increment_in(&mut conn, product_id, quantity).await
    }

    /// Overwrite the stock count
    pub async fn set_absolute(&self, product_id: &str, quantity: i32) -> AppResult<Product> {
        let mut conn = self.db.acquire().await?;
        Self::set_absolute_in(&mut conn, product_id, quantity).await
    }

    /// Apply one movement to a product
    pub async fn apply(&self, product_id: &str, movement: StockMovement) -> AppResult<Product> {
        match movement {
            StockMovement::In(quantity) => self.increment(product_id, quantity).await,
            StockMovement::Out(quantity) => self.decrement(product_id, quantity).await,
            StockMovement::Set(quantity) => self.set_absolute(product_id, quantity).await,
        }
    }

    pub async fn decrement_in(
        conn: &mut PgConnection,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<Product> {
        if quantity <= 0 {
            return Err(AppError::InvalidQuantity {
                product_id: Some(product_id.to_string()),
                quantity,
            });
        }

        let updated = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(product) = updated {
            tracing::debug!(product_id = %product_id, quantity, stock = product.stock, "Stock decremented");
            return Ok(product);
        }

        // Nothing matched: either the product is gone or it is short
        let available = sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;

        match available {
            None => Err(AppError::NotFound(format!("Product {}", product_id))),
            Some(available) => Err(AppError::InsufficientStock {
                product_id: product_id.to_string(),
                requested: quantity,
                available,
            }),
        }
    }

    pub async fn increment_in(
        conn: &mut PgConnection,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<Product> {
        if quantity <= 0 {
            return Err(AppError::InvalidQuantity {
                product_id: Some(product_id.to_string()),
                quantity,
            });
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET stock = stock + $2 WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", product_id)))?;

        tracing::debug!(product_id = %product_id, quantity, stock = product.stock, "Stock incremented");
        Ok(product)
    }

    pub async fn set_absolute_in(
        conn: &mut PgConnection,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<Product> {
        let quantity = ledger::set_absolute(quantity)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET stock = $2 WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", product_id)))?;

        tracing::info!(product_id = %product_id, stock = quantity, "Stock set");
        Ok(product)
    }
}
