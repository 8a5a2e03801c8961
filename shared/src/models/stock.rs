//! Stock accounting models
//!
//! Each stock row counts one glass type in one unit grouping. All rows of a
//! glass type draw from one physical pool of glasses, so availability is a
//! property of the glass type and every derived value here is computed from
//! the stored counts at read time.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Glassware;
use crate::types::{Amount, UnknownVariant};

/// Glasses in a small box
pub const SMALL_BOX_GLASSES: i32 = 6;

/// Glasses in a large box (8 small boxes)
pub const LARGE_BOX_GLASSES: i32 = 48;

/// Unit grouping a stock row is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Individual,
    SmallBox,
    LargeBox,
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Individual, UnitType::SmallBox, UnitType::LargeBox];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Individual => "individual",
            UnitType::SmallBox => "small_box",
            UnitType::LargeBox => "large_box",
        }
    }

    pub fn glasses_per_unit(&self) -> i32 {
        match self {
            UnitType::Individual => 1,
            UnitType::SmallBox => SMALL_BOX_GLASSES,
            UnitType::LargeBox => LARGE_BOX_GLASSES,
        }
    }

    /// Suffix appended to the glass type in catalog names
    pub fn catalog_suffix(&self) -> &'static str {
        match self {
            UnitType::Individual => "",
            UnitType::SmallBox => " Small Box",
            UnitType::LargeBox => " Large Box",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(UnitType::Individual),
            "small_box" => Ok(UnitType::SmallBox),
            "large_box" => Ok(UnitType::LargeBox),
            other => Err(UnknownVariant::new("unit type", other)),
        }
    }
}

/// Stock level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

/// Classify a stock level against its low-stock threshold
pub fn stock_status(current_stock: i32, low_stock_threshold: i32) -> StockStatus {
    if current_stock <= 0 {
        StockStatus::OutOfStock
    } else if current_stock <= low_stock_threshold {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Reason recorded on a stock adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    Order,
    Return,
    Damage,
    Restock,
    Manual,
}

impl AdjustmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentType::Order => "order",
            AdjustmentType::Return => "return",
            AdjustmentType::Damage => "damage",
            AdjustmentType::Restock => "restock",
            AdjustmentType::Manual => "manual",
        }
    }

    /// Order and return adjustments belong to the order lifecycle
    pub fn is_manual(&self) -> bool {
        matches!(
            self,
            AdjustmentType::Damage | AdjustmentType::Restock | AdjustmentType::Manual
        )
    }
}

impl fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(AdjustmentType::Order),
            "return" => Ok(AdjustmentType::Return),
            "damage" => Ok(AdjustmentType::Damage),
            "restock" => Ok(AdjustmentType::Restock),
            "manual" => Ok(AdjustmentType::Manual),
            other => Err(UnknownVariant::new("adjustment type", other)),
        }
    }
}

/// A stored stock row: one glass type in one unit grouping
///
/// This record is also the rentable catalog item; see [`StockRow::to_glassware`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    pub id: Uuid,
    pub glass_type: String,
    pub unit_type: UnitType,
    pub description: String,
    pub price_per_unit: Amount,
    /// Units of this grouping on hand, never negative
    pub current_stock: i32,
    pub low_stock_threshold: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockRow {
    pub fn glasses_per_unit(&self) -> i32 {
        self.unit_type.glasses_per_unit()
    }

    pub fn total_glasses(&self) -> i64 {
        i64::from(self.current_stock) * i64::from(self.glasses_per_unit())
    }

    pub fn status(&self) -> StockStatus {
        stock_status(self.current_stock, self.low_stock_threshold)
    }

    /// Catalog name, e.g. "Wine Glass Small Box"
    pub fn catalog_type(&self) -> String {
        super::catalog_type(&self.glass_type, self.unit_type)
    }

    pub fn to_glassware(&self) -> Glassware {
        Glassware {
            id: self.id,
            glassware_type: self.catalog_type(),
            description: self.description.clone(),
            quantity_available: self.current_stock,
            price_per_unit: self.price_per_unit,
            low_stock_threshold: self.low_stock_threshold,
            created_at: self.created_at,
        }
    }
}

/// Stock row with derived accounting values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: Uuid,
    pub glass_type: String,
    pub unit_type: UnitType,
    pub glasses_per_unit: i32,
    pub price_per_unit: Amount,
    pub current_stock: i32,
    pub low_stock_threshold: i32,
    pub total_glasses_for_unit_type: i64,
    /// Shared pool of the glass type, identical on every row of the type
    pub total_available_glasses: i64,
    pub stock_status: StockStatus,
    pub updated_at: DateTime<Utc>,
}

/// Immutable audit record of one stock change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub id: Uuid,
    pub stock_item_id: Uuid,
    pub adjustment_type: AdjustmentType,
    pub quantity_change: i32,
    pub reference_id: Option<Uuid>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Glasses currently on hand across every unit grouping of a glass type
pub fn pool_glasses(rows: &[StockRow], glass_type: &str) -> i64 {
    rows.iter()
        .filter(|row| row.glass_type == glass_type)
        .map(StockRow::total_glasses)
        .sum()
}

/// Units of a row that can still be rented given the glass type's pool
///
/// With a pool that includes this row and a non-negative stock the result is
/// always `current_stock`; the pool bound matters only for a pool that does not.
pub fn rentable_units(row: &StockRow, pool: i64) -> i32 {
    let by_pool = pool.max(0) / i64::from(row.glasses_per_unit());
    let units = i64::from(row.current_stock.max(0)).min(by_pool);
    i32::try_from(units).unwrap_or(i32::MAX)
}

/// Derived view over every stock row, ordered by glass type then unit size
pub fn stock_overview(rows: &[StockRow]) -> Vec<StockItem> {
    let mut items: Vec<StockItem> = rows
        .iter()
        .map(|row| StockItem {
            id: row.id,
            glass_type: row.glass_type.clone(),
            unit_type: row.unit_type,
            glasses_per_unit: row.glasses_per_unit(),
            price_per_unit: row.price_per_unit,
            current_stock: row.current_stock,
            low_stock_threshold: row.low_stock_threshold,
            total_glasses_for_unit_type: row.total_glasses(),
            total_available_glasses: pool_glasses(rows, &row.glass_type),
            stock_status: row.status(),
            updated_at: row.updated_at,
        })
        .collect();
    items.sort_by(|a, b| {
        a.glass_type
            .cmp(&b.glass_type)
            .then(a.unit_type.cmp(&b.unit_type))
    });
    items
}

/// Glass type offered for new orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockForOrder {
    pub stock_item_id: Uuid,
    pub glass_type: String,
    pub available_glasses: i64,
    pub price_per_unit: Amount,
}

/// Individual rows whose glass type still has glasses in the pool
pub fn stock_for_orders(rows: &[StockRow]) -> Vec<StockForOrder> {
    let mut offers: Vec<StockForOrder> = rows
        .iter()
        .filter(|row| row.unit_type == UnitType::Individual)
        .map(|row| StockForOrder {
            stock_item_id: row.id,
            glass_type: row.glass_type.clone(),
            available_glasses: pool_glasses(rows, &row.glass_type),
            price_per_unit: row.price_per_unit,
        })
        .filter(|offer| offer.available_glasses > 0)
        .collect();
    offers.sort_by(|a, b| a.glass_type.cmp(&b.glass_type));
    offers
}

/// Stock alert derived from a row's current status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub stock_item_id: Uuid,
    pub glass_type: String,
    pub unit_type: UnitType,
    pub alert_type: StockStatus,
    pub current_stock: i32,
    pub low_stock_threshold: i32,
    pub since: DateTime<Utc>,
}

/// Rows that are low or out of stock, out-of-stock first
pub fn active_alerts(rows: &[StockRow]) -> Vec<StockAlert> {
    let mut alerts: Vec<StockAlert> = rows
        .iter()
        .filter(|row| row.status() != StockStatus::InStock)
        .map(|row| StockAlert {
            stock_item_id: row.id,
            glass_type: row.glass_type.clone(),
            unit_type: row.unit_type,
            alert_type: row.status(),
            current_stock: row.current_stock,
            low_stock_threshold: row.low_stock_threshold,
            since: row.updated_at,
        })
        .collect();
    alerts.sort_by_key(|alert| (alert.alert_type != StockStatus::OutOfStock, alert.current_stock));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(glass_type: &str, unit_type: UnitType, current_stock: i32) -> StockRow {
        StockRow {
            id: Uuid::new_v4(),
            glass_type: glass_type.to_string(),
            unit_type,
            description: String::new(),
            price_per_unit: 450,
            current_stock,
            low_stock_threshold: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_glasses_per_unit() {
        assert_eq!(UnitType::Individual.glasses_per_unit(), 1);
        assert_eq!(UnitType::SmallBox.glasses_per_unit(), 6);
        assert_eq!(UnitType::LargeBox.glasses_per_unit(), 48);
        assert_eq!(LARGE_BOX_GLASSES, 8 * SMALL_BOX_GLASSES);
    }

    #[test]
    fn test_stock_status_boundaries() {
        assert_eq!(stock_status(0, 10), StockStatus::OutOfStock);
        assert_eq!(stock_status(1, 10), StockStatus::LowStock);
        assert_eq!(stock_status(10, 10), StockStatus::LowStock);
        assert_eq!(stock_status(11, 10), StockStatus::InStock);
        assert_eq!(stock_status(0, 0), StockStatus::OutOfStock);
    }

    #[test]
    fn test_pool_spans_unit_types() {
        let rows = vec![
            row("Wine Glass", UnitType::Individual, 50),
            row("Wine Glass", UnitType::SmallBox, 3),
            row("Beer Glass", UnitType::Individual, 240),
        ];

        assert_eq!(pool_glasses(&rows, "Wine Glass"), 68);
        assert_eq!(pool_glasses(&rows, "Beer Glass"), 240);
        assert_eq!(pool_glasses(&rows, "Champagne Glass"), 0);
    }

    #[test]
    fn test_overview_shares_pool_across_rows() {
        let rows = vec![
            row("Wine Glass", UnitType::SmallBox, 3),
            row("Wine Glass", UnitType::Individual, 50),
        ];
        let overview = stock_overview(&rows);

        assert_eq!(overview[0].unit_type, UnitType::Individual);
        assert_eq!(overview[1].unit_type, UnitType::SmallBox);
        assert!(overview.iter().all(|item| item.total_available_glasses == 68));
        assert_eq!(overview[1].total_glasses_for_unit_type, 18);
    }

    #[test]
    fn test_rentable_units_bounded_by_row() {
        let individual = row("Wine Glass", UnitType::Individual, 50);
        let boxes = row("Wine Glass", UnitType::SmallBox, 3);

        assert_eq!(rentable_units(&individual, 68), 50);
        assert_eq!(rentable_units(&boxes, 68), 3);
        assert_eq!(rentable_units(&boxes, 12), 2);
        assert_eq!(rentable_units(&boxes, -5), 0);
    }

    #[test]
    fn test_stock_for_orders_skips_empty_pools() {
        let rows = vec![
            row("Wine Glass", UnitType::Individual, 0),
            row("Wine Glass", UnitType::SmallBox, 1),
            row("Beer Glass", UnitType::Individual, 0),
        ];
        let offers = stock_for_orders(&rows);

        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].glass_type, "Wine Glass");
        assert_eq!(offers[0].available_glasses, 6);
    }

    #[test]
    fn test_active_alerts_out_of_stock_first() {
        let rows = vec![
            row("Wine Glass", UnitType::Individual, 5),
            row("Beer Glass", UnitType::Individual, 0),
            row("Cocktail Glass", UnitType::Individual, 100),
        ];
        let alerts = active_alerts(&rows);

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].alert_type, StockStatus::OutOfStock);
        assert_eq!(alerts[1].alert_type, StockStatus::LowStock);
    }

    #[test]
    fn test_enum_round_trip_through_strings() {
        for unit in UnitType::ALL {
            assert_eq!(unit.as_str().parse::<UnitType>().unwrap(), unit);
        }
        assert!("crate".parse::<UnitType>().is_err());
        assert_eq!("damage".parse::<AdjustmentType>().unwrap(), AdjustmentType::Damage);
        assert!(!AdjustmentType::Order.is_manual());
        assert!(!AdjustmentType::Return.is_manual());
        assert!(AdjustmentType::Restock.is_manual());
    }
}
