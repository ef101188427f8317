//! WebAssembly module for the inventory sale form
//!
//! Runs the same basket rules as the server so the form can reject a
//! malformed basket, and preview the receipt total, before it is submitted.
//! The server re-validates everything against locked rows.

use std::collections::HashMap;

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

pub use shared::basket::*;
pub use shared::models::Product;
pub use shared::validation::*;

fn to_js(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn parse_basket(client_id: i32, product_ids_json: &str, quantities_json: &str) -> Result<Basket, String> {
    let product_ids: Vec<String> = serde_json::from_str(product_ids_json)
        .map_err(|e| format!("Invalid product ids JSON: {}", e))?;
    let quantities: Vec<i32> = serde_json::from_str(quantities_json)
        .map_err(|e| format!("Invalid quantities JSON: {}", e))?;

    Basket::from_parallel(client_id, product_ids, quantities).map_err(|e| e.to_string())
}

fn check_basket(product_ids_json: &str, quantities_json: &str) -> Result<usize, String> {
    let basket = parse_basket(0, product_ids_json, quantities_json)?;
    for (index, line) in basket.lines().iter().enumerate() {
        validate_movement_quantity(line.quantity)
            .map_err(|e| format!("line {} ({}): {}", index + 1, line.product_id, e))?;
    }
    Ok(basket.lines().len())
}

fn plan_sale(
    client_id: i32,
    product_ids_json: &str,
    quantities_json: &str,
    products_json: &str,
) -> Result<SalePlan, String> {
    let basket = parse_basket(client_id, product_ids_json, quantities_json)?;
    let products: Vec<Product> = serde_json::from_str(products_json)
        .map_err(|e| format!("Invalid products JSON: {}", e))?;
    let catalog: HashMap<String, Product> =
        products.into_iter().map(|p| (p.id.clone(), p)).collect();

    basket.plan(&catalog).map_err(|e| e.to_string())
}

fn subtotal(unit_price: &str, quantity: i32) -> Result<Decimal, String> {
    let price: Decimal = unit_price
        .parse()
        .map_err(|e| format!("Invalid price {}: {}", unit_price, e))?;
    validate_non_negative_price(&price).map_err(|e| format!("Invalid price {}: {}", unit_price, e.code))?;
    validate_movement_quantity(quantity).map_err(str::to_string)?;
    price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| format!("Subtotal for {} x {} is out of range", quantity, unit_price))
}

/// Check a basket's shape and quantities; returns the number of lines
#[wasm_bindgen]
pub fn validate_basket(product_ids_json: &str, quantities_json: &str) -> Result<usize, JsValue> {
    check_basket(product_ids_json, quantities_json).map_err(to_js)
}

/// Plan a sale against the product list the page was rendered with.
///
/// Returns the plan as JSON: every line priced, plus the total.
#[wasm_bindgen]
pub fn preview_sale(
    client_id: i32,
    product_ids_json: &str,
    quantities_json: &str,
    products_json: &str,
) -> Result<String, JsValue> {
    let plan = plan_sale(client_id, product_ids_json, quantities_json, products_json).map_err(to_js)?;
    serde_json::to_string(&plan).map_err(|e| to_js(e.to_string()))
}

/// Price of one line, as a decimal string
#[wasm_bindgen]
pub fn line_subtotal(unit_price: &str, quantity: i32) -> Result<String, JsValue> {
    subtotal(unit_price, quantity)
        .map(|d| d.to_string())
        .map_err(to_js)
}

#[wasm_bindgen]
pub fn is_valid_product_id(id: &str) -> bool {
    validate_product_id(id).is_ok()
}

#[wasm_bindgen]
pub fn is_valid_nit(nit: &str) -> bool {
    validate_nit(nit).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCTS: &str = r#"[
        {"id": "P1", "name": "Mochila", "price": "10.50", "stock": 10, "category_id": 1},
        {"id": "P2", "name": "Bolso", "price": "4", "stock": 2, "category_id": 1}
    ]"#;

    #[test]
    fn test_check_basket() {
        assert_eq!(check_basket(r#"["P1","P2"]"#, "[1,2]"), Ok(2));
        assert!(check_basket(r#"["P1","P2"]"#, "[1]").is_err());
        assert!(check_basket("[]", "[]").is_err());
        assert!(check_basket(r#"["P1"]"#, "[0]").is_err());
        assert!(check_basket("not json", "[1]").is_err());
    }

    #[test]
    fn test_plan_sale_totals() {
        let plan = plan_sale(7, r#"["P1","P2"]"#, "[1,2]", PRODUCTS).unwrap();
        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.total, Decimal::new(1850, 2));
    }

    #[test]
    fn test_plan_sale_rejects_cumulative_overdraw() {
        let err = plan_sale(7, r#"["P2","P2"]"#, "[1,2]", PRODUCTS).unwrap_err();
        assert!(err.contains("P2"));
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(subtotal("2.25", 4), Ok(Decimal::new(900, 2)));
        assert!(subtotal("abc", 1).is_err());
        assert!(subtotal("1", 0).is_err());
        assert!(subtotal("-1", 1).is_err());
        assert!(subtotal(&Decimal::MAX.to_string(), 2).is_err());
    }

    #[test]
    fn test_plan_sale_with_huge_price_is_an_error() {
        let products = format!(
            r#"[{{"id": "P1", "name": "Mochila", "price": "{}", "stock": 10, "category_id": 1}}]"#,
            Decimal::MAX
        );
        let err = plan_sale(7, r#"["P1"]"#, "[2]", &products).unwrap_err();
        assert!(err.contains("P1"));
    }

    #[test]
    fn test_identifier_checks() {
        assert!(is_valid_product_id("P1"));
        assert!(!is_valid_product_id(""));
        assert!(is_valid_nit("NIT123"));
        assert!(!is_valid_nit(""));
    }
}
