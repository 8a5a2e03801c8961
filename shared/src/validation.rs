//! Validation utilities for the Glass Rental Management Platform

use chrono::NaiveDate;
use validator::ValidationError;

use crate::models::parse_catalog_type;

// ============================================================================
// Field Validators (used by `#[derive(Validate)]`)
// ============================================================================

/// Reject empty and whitespace-only values for required fields
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("This field is required".into());
        return Err(error);
    }
    Ok(())
}

/// Catalog names need a non-blank glass type in front of any box suffix
pub fn validate_catalog_type(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    let (glass_type, _) = parse_catalog_type(value);
    if glass_type.trim().is_empty() {
        let mut error = ValidationError::new("catalog_type");
        error.message = Some("Glassware type must name a glass type".into());
        return Err(error);
    }
    Ok(())
}

// ============================================================================
// Stock and Order Validations
// ============================================================================

/// Validate an ordered quantity
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be at least 1");
    }
    Ok(())
}

/// Validate that delivery does not precede the order
pub fn validate_rental_dates(order_date: NaiveDate, delivery_date: NaiveDate) -> Result<(), &'static str> {
    if delivery_date < order_date {
        return Err("Delivery date cannot be before the order date");
    }
    Ok(())
}

/// Apply a signed change to a stock level, returning the new level
pub fn apply_stock_change(current_stock: i32, quantity_change: i32) -> Result<i32, &'static str> {
    let new_stock = current_stock
        .checked_add(quantity_change)
        .ok_or("Stock change is out of range")?;
    if new_stock < 0 {
        return Err("Cannot reduce stock below zero");
    }
    Ok(new_stock)
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}
