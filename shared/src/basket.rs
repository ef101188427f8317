//! Sale baskets
//!
//! A basket is validated in two passes: its shape when it is built from the
//! request, then every line against a snapshot of the products it touches.
//! Nothing is mutated until the whole basket has a plan.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::{self, StockError};
use crate::models::Product;

/// One requested line of a sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i32,
}

/// Shape errors, raised before any product is looked at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BasketError {
    #[error("basket has {product_ids} product ids but {quantities} quantities")]
    LengthMismatch {
        product_ids: usize,
        quantities: usize,
    },

    #[error("basket has no lines")]
    Empty,
}

/// Line-level errors, raised while planning against current stock
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    #[error("line {line}: quantity for {product_id} must be positive, got {quantity}")]
    InvalidQuantity {
        line: usize,
        product_id: String,
        quantity: i32,
    },

    #[error("product {0} not found")]
    ProductNotFound(String),

    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i32,
        available: i32,
    },

    #[error("amount for {0} is out of range")]
    AmountOverflow(String),
}

/// A client's basket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    client_id: i32,
    lines: Vec<SaleLine>,
}

/// A validated line, priced at the product's current unit price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Every line of a basket, validated and priced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalePlan {
    pub lines: Vec<PlannedLine>,
    pub total: Decimal,
}

impl Basket {
    pub fn new(client_id: i32, lines: Vec<SaleLine>) -> Result<Self, BasketError> {
        if lines.is_empty() {
            return Err(BasketError::Empty);
        }
        Ok(Self { client_id, lines })
    }

    /// Build a basket from the parallel arrays a sale form submits
    pub fn from_parallel(
        client_id: i32,
        product_ids: Vec<String>,
        quantities: Vec<i32>,
    ) -> Result<Self, BasketError> {
        if product_ids.len() != quantities.len() {
            return Err(BasketError::LengthMismatch {
                product_ids: product_ids.len(),
                quantities: quantities.len(),
            });
        }

        let lines = product_ids
            .into_iter()
            .zip(quantities)
            .map(|(product_id, quantity)| SaleLine {
                product_id,
                quantity,
            })
            .collect();

        Self::new(client_id, lines)
    }

    pub fn client_id(&self) -> i32 {
        self.client_id
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    /// Distinct product ids in ascending order, the order rows are locked in
    pub fn product_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lines.iter().map(|l| l.product_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Validate every line in input order against `products`.
    ///
    /// Availability is checked against the running total requested for each
    /// product, so repeated lines for the same product cannot together take
    /// more than is on hand.
    pub fn plan(&self, products: &HashMap<String, Product>) -> Result<SalePlan, SaleError> {
        let mut requested: HashMap<&str, i32> = HashMap::new();
        let mut lines = Vec::with_capacity(self.lines.len());

        for (index, line) in self.lines.iter().enumerate() {
            if line.quantity <= 0 {
                return Err(SaleError::InvalidQuantity {
                    line: index + 1,
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                });
            }

            let product = products
                .get(&line.product_id)
                .ok_or_else(|| SaleError::ProductNotFound(line.product_id.clone()))?;

            let running = requested.entry(line.product_id.as_str()).or_insert(0);
            let total_requested = running.saturating_add(line.quantity);
            if !ledger::check_available(product.stock, total_requested) {
                return Err(SaleError::InsufficientStock {
                    product_id: product.id.clone(),
                    requested: total_requested,
                    available: product.stock,
                });
            }
            *running = total_requested;

            let subtotal = product
                .price
                .checked_mul(Decimal::from(line.quantity))
                .ok_or_else(|| SaleError::AmountOverflow(product.id.clone()))?;
            lines.push(PlannedLine {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity: line.quantity,
                unit_price: product.price,
                subtotal,
            });
        }

        let total = lines
            .iter()
            .try_fold(Decimal::ZERO, |total, l| {
                total
                    .checked_add(l.subtotal)
                    .ok_or_else(|| SaleError::AmountOverflow(l.product_id.clone()))
            })?;
        Ok(SalePlan { lines, total })
    }
}

impl SalePlan {
    /// Apply the plan's decrements to an in-memory product set.
    ///
    /// Either every line applies or `products` is left untouched.
    pub fn apply_to(&self, products: &mut HashMap<String, Product>) -> Result<(), StockError> {
        let mut next: HashMap<&str, i32> = HashMap::new();
        for line in &self.lines {
            let current = match next.get(line.product_id.as_str()) {
                Some(stock) => *stock,
                None => products
                    .get(&line.product_id)
                    .map(|p| p.stock)
                    .ok_or(StockError::Insufficient {
                        requested: line.quantity,
                        available: 0,
                    })?,
            };
            next.insert(line.product_id.as_str(), ledger::decrement(current, line.quantity)?);
        }

        for (id, stock) in next {
            if let Some(product) = products.get_mut(id) {
                product.stock = stock;
            }
        }
        Ok(())
    }

    /// Total units across all lines
    pub fn units(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity as i64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64, stock: i32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: Decimal::from(price),
            stock,
            category_id: 1,
        }
    }

    fn catalog(items: &[(&str, i64, i32)]) -> HashMap<String, Product> {
        items
            .iter()
            .map(|(id, price, stock)| (id.to_string(), product(id, *price, *stock)))
            .collect()
    }

    fn basket(lines: &[(&str, i32)]) -> Basket {
        Basket::from_parallel(
            1,
            lines.iter().map(|(id, _)| id.to_string()).collect(),
            lines.iter().map(|(_, q)| *q).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Basket::from_parallel(1, vec!["P1".to_string()], vec![1, 2]).unwrap_err();
        assert_eq!(
            err,
            BasketError::LengthMismatch {
                product_ids: 1,
                quantities: 2
            }
        );
    }

    #[test]
    fn test_empty_basket_rejected() {
        assert_eq!(
            Basket::from_parallel(1, vec![], vec![]).unwrap_err(),
            BasketError::Empty
        );
    }

    #[test]
    fn test_plan_prices_lines() {
        let products = catalog(&[("P1", 10, 10), ("P2", 3, 2)]);
        let plan = basket(&[("P1", 1), ("P2", 2)]).plan(&products).unwrap();
        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.lines[1].subtotal, Decimal::from(6));
        assert_eq!(plan.total, Decimal::from(16));
        assert_eq!(plan.units(), 3);
    }

    #[test]
    fn test_duplicate_lines_checked_cumulatively() {
        let products = catalog(&[("P1", 10, 5)]);
        let err = basket(&[("P1", 3), ("P1", 4)]).plan(&products).unwrap_err();
        assert_eq!(
            err,
            SaleError::InsufficientStock {
                product_id: "P1".to_string(),
                requested: 7,
                available: 5
            }
        );
    }

    #[test]
    fn test_invalid_quantity_reported_with_line() {
        let products = catalog(&[("P1", 10, 5)]);
        let err = basket(&[("P1", 1), ("P1", 0)]).plan(&products).unwrap_err();
        assert!(matches!(err, SaleError::InvalidQuantity { line: 2, .. }));
    }

    #[test]
    fn test_missing_product() {
        let products = catalog(&[("P1", 10, 5)]);
        let err = basket(&[("P9", 1)]).plan(&products).unwrap_err();
        assert_eq!(err, SaleError::ProductNotFound("P9".to_string()));
    }

    #[test]
    fn test_out_of_range_amount_is_an_error() {
        let mut products = catalog(&[("P1", 10, 5)]);
        if let Some(p) = products.get_mut("P1") {
            p.price = Decimal::MAX;
        }
        let err = basket(&[("P1", 2)]).plan(&products).unwrap_err();
        assert_eq!(err, SaleError::AmountOverflow("P1".to_string()));
    }

    #[test]
    fn test_errors_follow_input_order() {
        // Line 1 is short on stock, line 2 references a missing product
        let products = catalog(&[("P1", 10, 1)]);
        let err = basket(&[("P1", 2), ("P9", 1)]).plan(&products).unwrap_err();
        assert!(matches!(err, SaleError::InsufficientStock { .. }));
    }

    #[test]
    fn test_apply_to_decrements_every_line() {
        let mut products = catalog(&[("P1", 10, 10), ("P2", 3, 2)]);
        let plan = basket(&[("P1", 1), ("P2", 2)]).plan(&products).unwrap();
        plan.apply_to(&mut products).unwrap();
        assert_eq!(products["P1"].stock, 9);
        assert_eq!(products["P2"].stock, 0);
    }

    #[test]
    fn test_product_ids_sorted_and_distinct() {
        let b = basket(&[("P2", 1), ("P1", 1), ("P2", 3)]);
        assert_eq!(b.product_ids(), vec!["P1".to_string(), "P2".to_string()]);
    }
}
