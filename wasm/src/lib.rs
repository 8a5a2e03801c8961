//! WebAssembly module for the Glass Rental Management Platform
//!
//! Provides client-side computation for:
//! - Stock status and pool availability previews
//! - Order totals
//! - Catalog name parsing
//! - Form validation before submission

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse_rows(rows_json: &str) -> Result<Vec<StockRow>, JsValue> {
    serde_json::from_str(rows_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid stock rows JSON: {}", e)))
}

/// Classify a stock level: "in_stock", "low_stock" or "out_of_stock"
#[wasm_bindgen(js_name = stockStatus)]
pub fn stock_status_label(current_stock: i32, low_stock_threshold: i32) -> String {
    stock_status(current_stock, low_stock_threshold).as_str().to_string()
}

/// Order total in minor currency units; `NaN` when the total does not fit
#[wasm_bindgen(js_name = orderTotal)]
pub fn order_total_preview(price_per_unit: f64, quantity: i32) -> f64 {
    order_total(price_per_unit as Amount, quantity).map_or(f64::NAN, |total| total as f64)
}

/// Glasses on hand for a glass type across every unit grouping
#[wasm_bindgen(js_name = poolGlasses)]
pub fn pool_glasses_for(rows_json: &str, glass_type: &str) -> Result<f64, JsValue> {
    let rows = parse_rows(rows_json)?;
    Ok(pool_glasses(&rows, glass_type).max(0) as f64)
}

/// Largest order the given stock row can take right now
#[wasm_bindgen(js_name = rentableUnits)]
pub fn rentable_units_for(rows_json: &str, stock_item_id: &str) -> Result<i32, JsValue> {
    let rows = parse_rows(rows_json)?;
    let row = rows
        .iter()
        .find(|row| row.id.to_string() == stock_item_id)
        .ok_or_else(|| JsValue::from_str("Stock item not found"))?;
    Ok(rentable_units(row, pool_glasses(&rows, &row.glass_type)))
}

/// Split a catalog name into `[glassType, unitType]`
#[wasm_bindgen(js_name = parseCatalogType)]
pub fn parse_catalog_type_parts(name: &str) -> js_sys::Array {
    let (glass_type, unit_type) = parse_catalog_type(name.trim());
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(glass_type.trim()));
    parts.push(&JsValue::from_str(unit_type.as_str()));
    parts
}

/// Validate rental dates given as `YYYY-MM-DD`; returns an error message or nothing
#[wasm_bindgen(js_name = validateRentalDates)]
pub fn rental_dates_error(order_date: &str, delivery_date: &str) -> Option<String> {
    let parse = |value: &str| chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d");
    match (parse(order_date), parse(delivery_date)) {
        (Ok(order), Ok(delivery)) => validate_rental_dates(order, delivery)
            .err()
            .map(str::to_string),
        _ => Some("Dates must use the YYYY-MM-DD format".to_string()),
    }
}

/// Validate a requested order quantity against what the row can supply
#[wasm_bindgen(js_name = validateOrderQuantity)]
pub fn order_quantity_error(quantity: i32, rentable: i32) -> Option<String> {
    if let Err(message) = validate_quantity(quantity) {
        return Some(message.to_string());
    }
    (quantity > rentable).then(|| format!("Only {} available", rentable))
}

#[wasm_bindgen(js_name = validateEmail)]
pub fn email_is_valid(email: &str) -> bool {
    validate_email(email).is_ok()
}

/// Check a sign-up password; returns an error message or nothing
#[wasm_bindgen(js_name = validatePassword)]
pub fn password_error(password: &str) -> Option<String> {
    validate_password(password).err().map(str::to_string)
}
