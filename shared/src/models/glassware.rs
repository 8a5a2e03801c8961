//! Glassware catalog models
//!
//! A catalog item is the rentable face of a stock row. Its `type` is the glass
//! type followed by the unit suffix ("Wine Glass", "Wine Glass Small Box",
//! "Wine Glass Large Box").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::UnitType;
use crate::types::{Amount, SearchTerm};

/// A rentable glassware catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Glassware {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub glassware_type: String,
    pub description: String,
    /// Denominated in the item's own unit (glasses or boxes)
    pub quantity_available: i32,
    pub price_per_unit: Amount,
    pub low_stock_threshold: i32,
    pub created_at: DateTime<Utc>,
}

impl Glassware {
    pub fn matches_search(&self, term: &SearchTerm) -> bool {
        term.matches(&[&self.glassware_type, &self.description])
    }

    /// Value of the stock on hand, saturating at `Amount::MAX`
    pub fn stock_value(&self) -> Amount {
        Amount::from(self.quantity_available).saturating_mul(self.price_per_unit)
    }
}

/// Input for adding a catalog item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewGlassware {
    #[serde(rename = "type")]
    #[validate(custom = "crate::validation::validate_catalog_type")]
    pub glassware_type: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity_available: i32,
    #[validate(range(min = 0, max = 1000000000, message = "Price must be between 0 and 1000000000"))]
    pub price_per_unit: i64,
    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    pub low_stock_threshold: Option<i32>,
}

/// Partial update for a catalog item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GlasswarePatch {
    #[serde(rename = "type")]
    #[validate(custom = "crate::validation::validate_catalog_type")]
    pub glassware_type: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity_available: Option<i32>,
    #[validate(range(min = 0, max = 1000000000, message = "Price must be between 0 and 1000000000"))]
    pub price_per_unit: Option<i64>,
    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    pub low_stock_threshold: Option<i32>,
}

/// Render a catalog name from its glass type and unit grouping
pub fn catalog_type(glass_type: &str, unit_type: UnitType) -> String {
    format!("{}{}", glass_type, unit_type.catalog_suffix())
}

/// Split a catalog name into glass type and unit grouping
///
/// Inverse of [`catalog_type`]; a name without a box suffix is an individual item.
pub fn parse_catalog_type(name: &str) -> (String, UnitType) {
    for unit_type in [UnitType::SmallBox, UnitType::LargeBox] {
        if let Some(glass_type) = name.strip_suffix(unit_type.catalog_suffix()) {
            if !glass_type.trim().is_empty() {
                return (glass_type.to_string(), unit_type);
            }
        }
    }
    (name.to_string(), UnitType::Individual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_type() {
        assert_eq!(
            parse_catalog_type("Wine Glass"),
            ("Wine Glass".to_string(), UnitType::Individual)
        );
        assert_eq!(
            parse_catalog_type("Beer Glass Small Box"),
            ("Beer Glass".to_string(), UnitType::SmallBox)
        );
        assert_eq!(
            parse_catalog_type("Champagne Glass Large Box"),
            ("Champagne Glass".to_string(), UnitType::LargeBox)
        );
    }

    #[test]
    fn test_bare_suffix_is_individual() {
        assert_eq!(
            parse_catalog_type(" Small Box"),
            (" Small Box".to_string(), UnitType::Individual)
        );
    }

    #[test]
    fn test_catalog_names_round_trip() {
        for name in [
            "Wine Glass",
            "Wine Glass Small Box",
            "Cocktail Glass Large Box",
            "Mug",
            "Tumbler  Small Box",
        ] {
            let (glass_type, unit_type) = parse_catalog_type(name);
            assert_eq!(catalog_type(&glass_type, unit_type), name);
        }
    }

    #[test]
    fn test_stock_value() {
        let item = Glassware {
            id: Uuid::new_v4(),
            glassware_type: "Beer Glass Large Box".to_string(),
            description: "Beer glasses large box (48 glasses = 8 small boxes)".to_string(),
            quantity_available: 5,
            price_per_unit: 19_200,
            low_stock_threshold: 1,
            created_at: Utc::now(),
        };
        assert_eq!(item.stock_value(), 96_000);
    }

    #[test]
    fn test_stock_value_saturates() {
        let item = Glassware {
            id: Uuid::new_v4(),
            glassware_type: "Crystal Flute".to_string(),
            description: String::new(),
            quantity_available: 10,
            price_per_unit: Amount::MAX / 2 + 1,
            low_stock_threshold: 1,
            created_at: Utc::now(),
        };
        assert_eq!(item.stock_value(), Amount::MAX);
    }

    #[test]
    fn test_price_upper_bound() {
        let input = NewGlassware {
            glassware_type: "Crystal Flute".to_string(),
            description: String::new(),
            quantity_available: 10,
            price_per_unit: 1_000_000_001,
            low_stock_threshold: None,
        };
        assert!(input.validate().is_err());

        let patch = GlasswarePatch {
            price_per_unit: Some(Amount::MAX),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = GlasswarePatch {
            price_per_unit: Some(1_000_000_000),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_type_field_serializes_as_type() {
        let input: NewGlassware = serde_json::from_str(
            r#"{"type":"Wine Glass","description":"Elegant","quantityAvailable":144,"pricePerUnit":450}"#,
        )
        .unwrap();
        assert_eq!(input.glassware_type, "Wine Glass");
        assert_eq!(input.low_stock_threshold, None);
        assert!(input.validate().is_ok());
    }
}
