//! Client service

use shared::{Client, ClientPatch, ListQuery, NewClient};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};

const CLIENT_COLUMNS: &str = "id, name, phone, email, active";

/// Client service for managing buyers
#[derive(Clone)]
pub struct ClientService {
    db: PgPool,
}

impl ClientService {
    /// Create a new ClientService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a client. Emails are unique across all clients, active or not.
    pub async fn create(&self, input: NewClient) -> AppResult<Client> {
        input.validate()?;

        if self.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::DuplicateKey("email".to_string()));
        }

        // The unique constraint still guards against a concurrent insert
        let client = sqlx::query_as::<_, Client>(&format!(
            "INSERT INTO clients (name, phone, email) VALUES ($1, $2, $3) RETURNING {}",
            CLIENT_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(client_id = client.id, "Client created");
        Ok(client)
    }

    pub async fn get(&self, client_id: i32) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM clients WHERE id = $1",
            CLIENT_COLUMNS
        ))
        .bind(client_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Client>> {
        let (offset, limit) = query.bounds();
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM clients ORDER BY id OFFSET $1 LIMIT $2",
            CLIENT_COLUMNS
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(clients)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM clients WHERE email = $1",
            CLIENT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(client)
    }

    /// Apply a partial update
    pub async fn update(&self, client_id: i32, patch: ClientPatch) -> AppResult<Client> {
        patch.validate()?;

        let mut tx = self.db.begin().await?;

        let mut client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM clients WHERE id = $1 FOR UPDATE",
            CLIENT_COLUMNS
        ))
        .bind(client_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))?;

        if let Some(email) = &patch.email {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM clients WHERE email = $1 AND id <> $2)",
            )
            .bind(email)
            .bind(client_id)
            .fetch_one(&mut *tx)
            .await?;

            if taken {
                return Err(AppError::DuplicateKey("email".to_string()));
            }
        }

        client.apply(patch);

        let client = sqlx::query_as::<_, Client>(&format!(
            "UPDATE clients SET name = $2, phone = $3, email = $4 WHERE id = $1 RETURNING {}",
            CLIENT_COLUMNS
        ))
        .bind(client.id)
        .bind(&client.name)
        .bind(&client.phone)
        .bind(&client.email)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(client)
    }

    /// Activate or deactivate a client
    pub async fn set_active(&self, client_id: i32, active: bool) -> AppResult<Client> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "UPDATE clients SET active = $2 WHERE id = $1 RETURNING {}",
            CLIENT_COLUMNS
        ))
        .bind(client_id)
        .bind(active)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))?;

        tracing::info!(client_id, active, "Client activation changed");
        Ok(client)
    }

    pub async fn delete(&self, client_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Client".to_string()));
        }

        tracing::info!(client_id, "Client deleted");
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients WHERE active")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
