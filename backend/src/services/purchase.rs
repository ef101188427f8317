//! Purchase service: stock received from suppliers

use shared::{ListQuery, NewPurchase, Purchase, PurchaseLine, PurchaseWithLines};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::StockLedger;

#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

impl PurchaseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a purchase and add its lines to stock in one transaction
    pub async fn record(&self, input: NewPurchase) -> AppResult<PurchaseWithLines> {
        input.validate()?;
        if input.lines.is_empty() {
            return Err(AppError::validation(
                "lines",
                "A purchase needs at least one line",
                "La compra debe tener al menos una línea",
            ));
        }
        let total = input.total().ok_or_else(|| {
            AppError::validation(
                "unit_cost",
                "The purchase total exceeds the largest amount that can be stored",
                "El total de la compra excede el monto máximo permitido",
            )
        })?;

        let mut tx = self.db.begin().await?;

        let supplier_active = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE nit = $1)",
        )
        .bind(&input.supplier_nit)
        .fetch_one(&mut *tx)
        .await?;

        if !supplier_active {
            return Err(AppError::NotFound(format!("Supplier {}", input.supplier_nit)));
        }

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (supplier_nit, total)
            VALUES ($1, $2)
            RETURNING id, supplier_nit, total, purchased_at
            "#,
        )
        .bind(&input.supplier_nit)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        // Lock rows in ascending id order, as sales do
        let mut product_ids: Vec<String> =
            input.lines.iter().map(|l| l.product_id.clone()).collect();
        product_ids.sort_unstable();
        product_ids.dedup();
        sqlx::query("SELECT id FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(&product_ids)
            .execute(&mut *tx)
            .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for (index, line) in input.lines.iter().enumerate() {
            // Fails with NotFound before the line row would hit the foreign key
            StockLedger::increment_in(&mut tx, &line.product_id, line.quantity).await?;

            let recorded = sqlx::query_as::<_, PurchaseLine>(
                r#"
                INSERT INTO purchase_lines (purchase_id, line_no, product_id, quantity, unit_cost)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING purchase_id, product_id, quantity, unit_cost
                "#,
            )
            .bind(purchase.id)
            .bind(index as i32 + 1)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.unit_cost)
            .fetch_one(&mut *tx)
            .await?;

            lines.push(recorded);
        }

        tx.commit().await?;

        tracing::info!(
            purchase_id = %purchase.id,
            supplier_nit = %purchase.supplier_nit,
            lines = lines.len(),
            "Purchase recorded"
        );

        Ok(PurchaseWithLines { purchase, lines })
    }

    pub async fn get(&self, purchase_id: Uuid) -> AppResult<PurchaseWithLines> {
        let purchase = sqlx::query_as::<_, Purchase>(
            "SELECT id, supplier_nit, total, purchased_at FROM purchases WHERE id = $1",
        )
        .bind(purchase_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let lines = sqlx::query_as::<_, PurchaseLine>(
            r#"
            SELECT purchase_id, product_id, quantity, unit_cost
            FROM purchase_lines
            WHERE purchase_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseWithLines { purchase, lines })
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Purchase>> {
        let (offset, limit) = query.bounds();
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, supplier_nit, total, purchased_at
            FROM purchases
            ORDER BY purchased_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(purchases)
    }
}
