//! Category service

use shared::{Category, CategoryPatch, ListQuery, NewCategory};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

impl CategoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewCategory) -> AppResult<Category> {
        input.validate()?;

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, code) VALUES ($1, $2) RETURNING id, name, code",
        )
        .bind(&input.name)
        .bind(&input.code)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(category_id = category.id, code = %category.code, "Category created");
        Ok(category)
    }

    pub async fn get(&self, category_id: i32) -> AppResult<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name, code FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Category>> {
        let (offset, limit) = query.bounds();
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, code FROM categories ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    pub async fn update(&self, category_id: i32, patch: CategoryPatch) -> AppResult<Category> {
        patch.validate()?;

        let mut tx = self.db.begin().await?;

        let mut category = sqlx::query_as::<_, Category>(
            "SELECT id, name, code FROM categories WHERE id = $1 FOR UPDATE",
        )
        .bind(category_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

        category.apply(patch);

        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2, code = $3 WHERE id = $1 RETURNING id, name, code",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.code)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(category)
    }

    /// Delete a category. Fails with a conflict while products still use it.
    pub async fn delete(&self, category_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        tracing::info!(category_id, "Category deleted");
        Ok(())
    }

    pub async fn exists(&self, category_id: i32) -> AppResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&self.db)
                .await?;
        Ok(exists)
    }
}
