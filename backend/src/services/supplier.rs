//! Supplier service and archive
//!
//! Suppliers are never deleted outright. Archiving moves the row to
//! `supplier_backups` and restoring moves it back; both moves happen in a
//! single transaction so a supplier is always in exactly one table.

use shared::{
    ListQuery, NewSupplier, Supplier, SupplierBackup, SupplierPatch, SupplierState,
    SupplierSummary,
};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};

const SUPPLIER_COLUMNS: &str = "nit, name, contact, address, city";

/// Supplier service for managing active and archived suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Which set a nit currently lives in, if any
    pub async fn state_of(&self, nit: &str) -> AppResult<Option<SupplierState>> {
        let (active, archived) = sqlx::query_as::<_, (bool, bool)>(
            r#"
            SELECT EXISTS(SELECT 1 FROM suppliers WHERE nit = $1),
                   EXISTS(SELECT 1 FROM supplier_backups WHERE nit = $1)
            "#,
        )
        .bind(nit)
        .fetch_one(&self.db)
        .await?;

        Ok(match (active, archived) {
            (true, _) => Some(SupplierState::Active),
            (false, true) => Some(SupplierState::Archived),
            (false, false) => None,
        })
    }

    /// Create a supplier. The nit must be unused in both sets.
    pub async fn create(&self, input: NewSupplier) -> AppResult<Supplier> {
        input.validate()?;

        if let Some(state) = self.state_of(&input.nit).await? {
            tracing::debug!(nit = %input.nit, %state, "Supplier nit already in use");
            return Err(AppError::DuplicateKey("nit".to_string()));
        }

        let supplier = Supplier::from(input);
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "INSERT INTO suppliers ({0}) VALUES ($1, $2, $3, $4, $5) RETURNING {0}",
            SUPPLIER_COLUMNS
        ))
        .bind(&supplier.nit)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.address)
        .bind(&supplier.city)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(nit = %supplier.nit, "Supplier created");
        Ok(supplier)
    }

    pub async fn get(&self, nit: &str) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {} FROM suppliers WHERE nit = $1",
            SUPPLIER_COLUMNS
        ))
        .bind(nit)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Supplier {}", nit)))
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Supplier>> {
        let (offset, limit) = query.bounds();
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {} FROM suppliers ORDER BY name, nit OFFSET $1 LIMIT $2",
            SUPPLIER_COLUMNS
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    /// Nit, name and contact of every active supplier
    pub async fn list_summary(&self) -> AppResult<Vec<SupplierSummary>> {
        let summary = sqlx::query_as::<_, SupplierSummary>(
            "SELECT nit, name, contact FROM suppliers ORDER BY name, nit",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(summary)
    }

    pub async fn list_archived(&self, query: &ListQuery) -> AppResult<Vec<SupplierBackup>> {
        let (offset, limit) = query.bounds();
        let suppliers = sqlx::query_as::<_, SupplierBackup>(&format!(
            "SELECT {} FROM supplier_backups ORDER BY name, nit OFFSET $1 LIMIT $2",
            SUPPLIER_COLUMNS
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    /// Apply a partial update to an active supplier
    pub async fn update(&self, nit: &str, patch: SupplierPatch) -> AppResult<Supplier> {
        patch.validate()?;

        let mut tx = self.db.begin().await?;

        let mut supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {} FROM suppliers WHERE nit = $1 FOR UPDATE",
            SUPPLIER_COLUMNS
        ))
        .bind(nit)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Supplier {}", nit)))?;

        supplier.apply(patch);

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "UPDATE suppliers SET name = $2, contact = $3, address = $4, city = $5 WHERE nit = $1 RETURNING {}",
            SUPPLIER_COLUMNS
        ))
        .bind(&supplier.nit)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.address)
        .bind(&supplier.city)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(supplier)
    }

    /// Move an active supplier into the archive
    pub async fn archive(&self, nit: &str) -> AppResult<SupplierBackup> {
        let mut tx = self.db.begin().await?;

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "DELETE FROM suppliers WHERE nit = $1 RETURNING {}",
            SUPPLIER_COLUMNS
        ))
        .bind(nit)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Supplier {}", nit)))?;

        let backup = SupplierBackup::from(supplier);
        let backup = sqlx::query_as::<_, SupplierBackup>(&format!(
            "INSERT INTO supplier_backups ({0}) VALUES ($1, $2, $3, $4, $5) RETURNING {0}",
            SUPPLIER_COLUMNS
        ))
        .bind(&backup.nit)
        .bind(&backup.name)
        .bind(&backup.contact)
        .bind(&backup.address)
        .bind(&backup.city)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(nit = %nit, "Supplier archived");
        Ok(backup)
    }

    /// Move an archived supplier back into the active set
    pub async fn restore(&self, nit: &str) -> AppResult<Supplier> {
        let mut tx = self.db.begin().await?;

        let backup = sqlx::query_as::<_, SupplierBackup>(&format!(
            "DELETE FROM supplier_backups WHERE nit = $1 RETURNING {}",
            SUPPLIER_COLUMNS
        ))
        .bind(nit)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Archived supplier {}", nit)))?;

        let supplier = Supplier::from(backup);
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "INSERT INTO suppliers ({0}) VALUES ($1, $2, $3, $4, $5) RETURNING {0}",
            SUPPLIER_COLUMNS
        ))
        .bind(&supplier.nit)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.address)
        .bind(&supplier.city)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(nit = %nit, "Supplier restored");
        Ok(supplier)
    }

    /// Active and archived supplier counts
    pub async fn counts(&self) -> AppResult<(i64, i64)> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            "SELECT (SELECT COUNT(*) FROM suppliers), (SELECT COUNT(*) FROM supplier_backups)",
        )
        .fetch_one(&self.db)
        .await?;
        Ok(counts)
    }
}
