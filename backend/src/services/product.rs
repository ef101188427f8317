//! Product catalog service

use shared::{ListQuery, NewProduct, Product, ProductPatch};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::CategoryService;

/// Products at or below this many units are flagged as low on stock
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Product service for managing the catalog
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn ensure_category(&self, category_id: i32) -> AppResult<()> {
        if !CategoryService::new(self.db.clone()).exists(category_id).await? {
            return Err(AppError::validation(
                "category_id",
                "The specified category does not exist",
                "La categoría especificada no existe",
            ));
        }
        Ok(())
    }

    /// Create a product
    pub async fn create(&self, input: NewProduct) -> AppResult<Product> {
        input.validate()?;
        self.ensure_category(input.category_id).await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, price, stock, category_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, price, stock, category_id
            "#,
        )
        .bind(&input.id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Get a product by id
    pub async fn get(&self, product_id: &str) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock, category_id FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", product_id)))
    }

    /// List products by id
    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Product>> {
        let (offset, limit) = query.bounds();
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock, category_id
            FROM products
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// List the products of one category
    pub async fn list_by_category(&self, category_id: i32) -> AppResult<Vec<Product>> {
        if !CategoryService::new(self.db.clone()).exists(category_id).await? {
            return Err(AppError::NotFound("Category".to_string()));
        }

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock, category_id
            FROM products
            WHERE category_id = $1
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Products running low, lowest stock first
    pub async fn low_stock(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock, category_id
            FROM products
            WHERE stock <= $1
            ORDER BY stock, id
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Apply a partial update
    pub async fn update(&self, product_id: &str, patch: ProductPatch) -> AppResult<Product> {
        patch.validate()?;
        if let Some(category_id) = patch.category_id {
            self.ensure_category(category_id).await?;
        }

        let mut tx = self.db.begin().await?;

        let mut product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock, category_id FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", product_id)))?;

        product.apply(patch);

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, price = $3, stock = $4, category_id = $5
            WHERE id = $1
            RETURNING id, name, price, stock, category_id
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.category_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Delete a product
    pub async fn delete(&self, product_id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {}", product_id)));
        }

        tracing::info!(product_id = %product_id, "Product deleted");
        Ok(())
    }

    pub async fn exists(&self, product_id: &str) -> AppResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;
        Ok(exists)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
