//! Product models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{validate_non_negative_price, validate_product_id};

/// A product held in stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    /// Units on hand, never negative
    pub stock: i32,
    pub category_id: i32,
}

/// Input for creating a product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(custom = "validate_product_id")]
    pub id: String,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(custom = "validate_non_negative_price")]
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i32,
    pub category_id: i32,
}

/// Partial update for a product; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(custom = "validate_non_negative_price")]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub category_id: Option<i32>,
}

impl Product {
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
    }

    /// Stock value of this product at its unit price
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.stock)
    }
}
