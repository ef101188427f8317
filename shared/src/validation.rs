//! Validation utilities for the inventory system
//!
//! Field-level checks used both by `validator` derives on request inputs
//! and directly by the backend services.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Largest page a listing endpoint will return
pub const MAX_PAGE_SIZE: i64 = 500;

/// Default page size when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 100;

// ============================================================================
// Identifiers
// ============================================================================

/// Product identifiers are 1-40 characters of letters, digits, `-` or `_`
pub fn validate_product_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > 40 {
        return Err(ValidationError::new("product_id_length"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::new("product_id_charset"));
    }
    Ok(())
}

/// NIT: digits with an optional check digit after a dash, or an
/// alphanumeric business key such as "NIT123"
pub fn validate_nit(nit: &str) -> Result<(), ValidationError> {
    if nit.len() < 3 || nit.len() > 20 {
        return Err(ValidationError::new("nit_length"));
    }
    if !nit.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::new("nit_charset"));
    }
    if nit.starts_with('-') || nit.ends_with('-') || nit.matches('-').count() > 1 {
        return Err(ValidationError::new("nit_format"));
    }
    Ok(())
}

// ============================================================================
// Amounts
// ============================================================================

/// Largest unit price or cost a `NUMERIC(12, 2)` column holds
pub const MAX_UNIT_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Largest purchase total a `NUMERIC(14, 2)` column holds
pub const MAX_TOTAL_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

pub fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("negative_price"));
    }
    if *price > MAX_UNIT_AMOUNT {
        return Err(ValidationError::new("price_too_large"));
    }
    Ok(())
}

/// Validate a quantity that moves stock (sale, purchase, increment)
pub fn validate_movement_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

// ============================================================================
// Listing
// ============================================================================

/// Clamp skip/limit query parameters into a safe offset/limit pair
pub fn clamp_pagination(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let offset = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (offset, limit)
}

// ============================================================================
// Files
// ============================================================================

/// Receipt names become file names, so only a safe charset is accepted
pub fn is_safe_receipt_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 128
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
