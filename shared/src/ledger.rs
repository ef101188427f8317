//! Stock ledger arithmetic
//!
//! Pure rules for moving a product's stock. The backend runs the same
//! checks in SQL; these functions are the reference the services and the
//! browser share.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("stock cannot be set to a negative value ({0})")]
    NegativeStock(i32),

    #[error("insufficient stock: requested {requested}, available {available}")]
    Insufficient { requested: i32, available: i32 },

    #[error("stock would overflow")]
    Overflow,
}

/// True iff `quantity` units can be taken from `stock`
pub fn check_available(stock: i32, quantity: i32) -> bool {
    quantity >= 0 && stock >= quantity
}

/// Take `quantity` units out of `stock`
pub fn decrement(stock: i32, quantity: i32) -> Result<i32, StockError> {
    if quantity <= 0 {
        return Err(StockError::InvalidQuantity(quantity));
    }
    if !check_available(stock, quantity) {
        return Err(StockError::Insufficient {
            requested: quantity,
            available: stock,
        });
    }
    Ok(stock - quantity)
}

/// Add `quantity` units to `stock`
pub fn increment(stock: i32, quantity: i32) -> Result<i32, StockError> {
    if quantity <= 0 {
        return Err(StockError::InvalidQuantity(quantity));
    }
    stock.checked_add(quantity).ok_or(StockError::Overflow)
}

/// Replace the stock with an absolute count
pub fn set_absolute(quantity: i32) -> Result<i32, StockError> {
    if quantity < 0 {
        return Err(StockError::NegativeStock(quantity));
    }
    Ok(quantity)
}

/// A single stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "quantity", rename_all = "snake_case")]
pub enum StockMovement {
    In(i32),
    Out(i32),
    Set(i32),
}

impl StockMovement {
    pub fn apply(self, stock: i32) -> Result<i32, StockError> {
        match self {
            StockMovement::In(q) => increment(stock, q),
            StockMovement::Out(q) => decrement(stock, q),
            StockMovement::Set(q) => set_absolute(q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_check_available() {
        assert!(check_available(5, 5));
        assert!(check_available(5, 0));
        assert!(!check_available(5, 6));
        assert!(!check_available(5, -1));
    }

    #[test]
    fn test_decrement_to_zero() {
        assert_eq!(decrement(2, 2), Ok(0));
    }

    #[test]
    fn test_decrement_below_zero_rejected() {
        assert_eq!(
            decrement(2, 3),
            Err(StockError::Insufficient {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_non_positive_quantities_rejected() {
        assert_eq!(decrement(5, 0), Err(StockError::InvalidQuantity(0)));
        assert_eq!(increment(5, -2), Err(StockError::InvalidQuantity(-2)));
    }

    #[test]
    fn test_increment_overflow() {
        assert_eq!(increment(i32::MAX, 1), Err(StockError::Overflow));
    }

    #[test]
    fn test_set_absolute() {
        assert_eq!(set_absolute(0), Ok(0));
        assert_eq!(set_absolute(-1), Err(StockError::NegativeStock(-1)));
    }

    fn movement_strategy() -> impl Strategy<Value = (bool, i32)> {
        (any::<bool>(), 1i32..50)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Committed movements add up exactly and never leave negative stock
        #[test]
        fn prop_committed_movements_balance(
            initial in 0i32..100,
            moves in prop::collection::vec(movement_strategy(), 0..40)
        ) {
            let mut stock = initial;
            let mut total_in = 0i64;
            let mut total_out = 0i64;

            for (is_in, q) in moves {
                let movement = if is_in { StockMovement::In(q) } else { StockMovement::Out(q) };
                match movement.apply(stock) {
                    Ok(next) => {
                        if is_in { total_in += q as i64 } else { total_out += q as i64 }
                        stock = next;
                    }
                    Err(StockError::Insufficient { .. }) => prop_assert!(!is_in),
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
                prop_assert!(stock >= 0);
            }

            prop_assert_eq!(stock as i64, initial as i64 + total_in - total_out);
        }
    }
}
