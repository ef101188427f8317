//! Service tests against PostgreSQL
//!
//! Each test gets a fresh database with the migrations applied
//! (`DATABASE_URL` must point at a server the tests may create databases on).

use std::path::PathBuf;

use inventory_backend::error::AppError;
use inventory_backend::services::{ClientService, PurchaseService, SaleService, SupplierService};
use inventory_backend::ReceiptStore;
use rust_decimal::Decimal;
use shared::{Basket, NewClient, NewPurchase, NewPurchaseLine, NewSupplier, SupplierState};
use sqlx::PgPool;
use uuid::Uuid;

// ============================================================================
// Fixtures
// ============================================================================

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("inventory-db-receipts-{}", Uuid::new_v4()))
}

async fn seed_products(pool: &PgPool, products: &[(&str, i64, i32)]) {
    let category_id: i32 =
        sqlx::query_scalar("INSERT INTO categories (name, code) VALUES ('Velas', 'VEL') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();

    for (id, price, stock) in products {
        sqlx::query(
            "INSERT INTO products (id, name, price, stock, category_id) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(*id)
        .bind(format!("Vela {}", id))
        .bind(Decimal::from(*price))
        .bind(*stock)
        .bind(category_id)
        .execute(pool)
        .await
        .unwrap();
    }
}

async fn stock_of(pool: &PgPool, product_id: &str) -> i32 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn new_client(email: &str) -> NewClient {
    NewClient {
        name: "Ana Gómez".to_string(),
        phone: "3001234567".to_string(),
        email: email.to_string(),
    }
}

fn nit123() -> NewSupplier {
    NewSupplier {
        nit: "NIT123".to_string(),
        name: "Parafinas de Colombia".to_string(),
        contact: "Marta Ríos".to_string(),
        address: "Carrera 7 # 12-30".to_string(),
        city: "Bogotá".to_string(),
    }
}

fn basket(client_id: i32, lines: &[(&str, i32)]) -> Basket {
    Basket::from_parallel(
        client_id,
        lines.iter().map(|(id, _)| id.to_string()).collect(),
        lines.iter().map(|(_, q)| *q).collect(),
    )
    .unwrap()
}

// ============================================================================
// Sales
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
async fn test_repeated_line_over_stock_changes_nothing(pool: PgPool) {
    seed_products(&pool, &[("P1", 10, 5)]).await;
    let client = ClientService::new(pool.clone())
        .create(new_client("ana@example.com"))
        .await
        .unwrap();
    let dir = scratch_dir();
    let sales = SaleService::new(pool.clone(), ReceiptStore::new(&dir));

    let err = sales
        .process_sale(basket(client.id, &[("P1", 3), ("P1", 4)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientStock { ref product_id, requested: 7, available: 5 } if product_id == "P1"
    ));
    assert_eq!(stock_of(&pool, "P1").await, 5);
    assert!(sales.list_receipts().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_two_line_sale_commits_and_writes_receipt(pool: PgPool) {
    seed_products(&pool, &[("P1", 10, 10), ("P2", 4, 2)]).await;
    let client = ClientService::new(pool.clone())
        .create(new_client("ana@example.com"))
        .await
        .unwrap();
    let dir = scratch_dir();
    let sales = SaleService::new(pool.clone(), ReceiptStore::new(&dir));

    let confirmation = sales
        .process_sale(basket(client.id, &[("P1", 1), ("P2", 2)]))
        .await
        .unwrap();

    assert_eq!(stock_of(&pool, "P1").await, 9);
    assert_eq!(stock_of(&pool, "P2").await, 0);
    assert_eq!(confirmation.total, Decimal::from(18));

    let text = sales.get_receipt(&confirmation.receipt_id).await.unwrap();
    assert!(text.contains("P1"));
    assert!(text.contains("P2"));
    assert!(text.contains(&format!("Ana Gómez (#{})", client.id)));

    let listed = sales.list_receipts().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, confirmation.receipt_id);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_short_second_line_rolls_back_first(pool: PgPool) {
    seed_products(&pool, &[("P1", 10, 10), ("P2", 4, 1)]).await;
    let client = ClientService::new(pool.clone())
        .create(new_client("ana@example.com"))
        .await
        .unwrap();
    let sales = SaleService::new(pool.clone(), ReceiptStore::new(scratch_dir()));

    let err = sales
        .process_sale(basket(client.id, &[("P1", 4), ("P2", 2)]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InsufficientStock { .. }));
    assert_eq!(stock_of(&pool, "P1").await, 10);
    assert_eq!(stock_of(&pool, "P2").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sale_rejects_unknown_and_inactive_clients(pool: PgPool) {
    seed_products(&pool, &[("P1", 10, 10)]).await;
    let clients = ClientService::new(pool.clone());
    let client = clients.create(new_client("ana@example.com")).await.unwrap();
    clients.set_active(client.id, false).await.unwrap();
    let sales = SaleService::new(pool.clone(), ReceiptStore::new(scratch_dir()));

    let err = sales
        .process_sale(basket(client.id, &[("P1", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "client_id"));

    let err = sales
        .process_sale(basket(client.id + 1000, &[("P1", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(stock_of(&pool, "P1").await, 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_receipt_failure_after_commit_is_reported(pool: PgPool) {
    seed_products(&pool, &[("P1", 10, 10)]).await;
    let client = ClientService::new(pool.clone())
        .create(new_client("ana@example.com"))
        .await
        .unwrap();

    // A plain file where the receipts directory should be
    let blocker = scratch_dir();
    std::fs::write(&blocker, "not a directory").unwrap();
    let sales = SaleService::new(pool.clone(), ReceiptStore::new(blocker.join("receipts")));

    let err = sales
        .process_sale(basket(client.id, &[("P1", 3)]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ReceiptWriteFailed { .. }));
    assert_eq!(stock_of(&pool, "P1").await, 7);

    std::fs::remove_file(&blocker).unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_guarded_decrement_never_goes_negative(pool: PgPool) {
    seed_products(&pool, &[("P1", 10, 2)]).await;
    let mut conn = pool.acquire().await.unwrap();

    let err = inventory_backend::services::StockLedger::decrement_in(&mut conn, "P1", 3)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock { requested: 3, available: 2, .. }));

    let missing = inventory_backend::services::StockLedger::decrement_in(&mut conn, "P9", 1)
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));

    assert_eq!(stock_of(&pool, "P1").await, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stock_movements_apply_in_order(pool: PgPool) {
    use inventory_backend::services::StockLedger;
    use shared::ledger::StockMovement;

    seed_products(&pool, &[("P1", 10, 2)]).await;
    let ledger = StockLedger::new(pool.clone());

    assert_eq!(ledger.apply("P1", StockMovement::In(5)).await.unwrap().stock, 7);
    assert_eq!(ledger.apply("P1", StockMovement::Out(3)).await.unwrap().stock, 4);
    assert_eq!(ledger.apply("P1", StockMovement::Set(20)).await.unwrap().stock, 20);

    let err = ledger.apply("P1", StockMovement::Out(21)).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock { requested: 21, available: 20, .. }));
    assert_eq!(stock_of(&pool, "P1").await, 20);
}

// ============================================================================
// Suppliers
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
async fn test_archive_and_restore_nit123(pool: PgPool) {
    let suppliers = SupplierService::new(pool.clone());
    let created = suppliers.create(nit123()).await.unwrap();

    let archived = suppliers.archive("NIT123").await.unwrap();
    assert_eq!(
        suppliers.state_of("NIT123").await.unwrap(),
        Some(SupplierState::Archived)
    );
    assert!(matches!(
        suppliers.get("NIT123").await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(archived.name, created.name);

    let restored = suppliers.restore("NIT123").await.unwrap();
    assert_eq!(restored, created);
    assert_eq!(
        suppliers.state_of("NIT123").await.unwrap(),
        Some(SupplierState::Active)
    );
    assert_eq!(suppliers.counts().await.unwrap(), (1, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_archive_lifecycle_errors(pool: PgPool) {
    let suppliers = SupplierService::new(pool.clone());

    assert!(matches!(
        suppliers.archive("NIT123").await,
        Err(AppError::NotFound(_))
    ));

    suppliers.create(nit123()).await.unwrap();
    suppliers.archive("NIT123").await.unwrap();

    assert!(matches!(
        suppliers.archive("NIT123").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        suppliers.create(nit123()).await,
        Err(AppError::DuplicateKey(ref field)) if field == "nit"
    ));
    assert_eq!(suppliers.counts().await.unwrap(), (0, 1));
}

// ============================================================================
// Clients
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_writes_no_row(pool: PgPool) {
    let clients = ClientService::new(pool.clone());
    clients.create(new_client("ana@example.com")).await.unwrap();

    let err = clients
        .create(new_client("ana@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateKey(ref field) if field == "email"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE email = $1")
        .bind("ana@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

// ============================================================================
// Purchases
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
async fn test_purchase_increments_every_line(pool: PgPool) {
    seed_products(&pool, &[("P1", 10, 1), ("P2", 4, 0)]).await;
    SupplierService::new(pool.clone())
        .create(nit123())
        .await
        .unwrap();

    let purchase = PurchaseService::new(pool.clone())
        .record(NewPurchase {
            supplier_nit: "NIT123".to_string(),
            lines: vec![
                NewPurchaseLine {
                    product_id: "P2".to_string(),
                    quantity: 5,
                    unit_cost: Decimal::from(2),
                },
                NewPurchaseLine {
                    product_id: "P1".to_string(),
                    quantity: 3,
                    unit_cost: Decimal::from(6),
                },
            ],
        })
        .await
        .unwrap();

    assert_eq!(purchase.purchase.total, Decimal::from(28));
    assert_eq!(purchase.lines.len(), 2);
    assert_eq!(stock_of(&pool, "P1").await, 4);
    assert_eq!(stock_of(&pool, "P2").await, 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_purchase_with_unknown_product_rolls_back(pool: PgPool) {
    seed_products(&pool, &[("P1", 10, 1)]).await;
    SupplierService::new(pool.clone())
        .create(nit123())
        .await
        .unwrap();

    let err = PurchaseService::new(pool.clone())
        .record(NewPurchase {
            supplier_nit: "NIT123".to_string(),
            lines: vec![
                NewPurchaseLine {
                    product_id: "P1".to_string(),
                    quantity: 3,
                    unit_cost: Decimal::from(6),
                },
                NewPurchaseLine {
                    product_id: "P9".to_string(),
                    quantity: 1,
                    unit_cost: Decimal::from(6),
                },
            ],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(stock_of(&pool, "P1").await, 1);

    let purchases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(purchases, 0);
}
