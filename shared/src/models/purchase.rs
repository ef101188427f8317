//! Purchase models (stock received from suppliers)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_non_negative_price, MAX_TOTAL_AMOUNT};

/// A recorded purchase from a supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: Uuid,
    pub supplier_nit: String,
    pub total: Decimal,
    pub purchased_at: DateTime<Utc>,
}

/// One line of a purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseLine {
    pub purchase_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
}

/// Purchase with its lines
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseWithLines {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub lines: Vec<PurchaseLine>,
}

/// Input for recording a purchase
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPurchase {
    #[validate(length(min = 1))]
    pub supplier_nit: String,
    #[validate]
    pub lines: Vec<NewPurchaseLine>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPurchaseLine {
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(custom = "validate_non_negative_price")]
    pub unit_cost: Decimal,
}

impl NewPurchase {
    /// Total cost of all lines, or `None` when it would not fit the
    /// purchases table
    pub fn total(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |total, l| {
                l.unit_cost
                    .checked_mul(Decimal::from(l.quantity))
                    .and_then(|subtotal| total.checked_add(subtotal))
            })
            .filter(|total| *total <= MAX_TOTAL_AMOUNT)
    }
}
