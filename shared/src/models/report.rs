//! Dashboard and inventory summary models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Glassware, Order, OrderStatus, StockRow, UnitType};
use crate::types::Amount;

/// Headline figures for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_customers: i64,
    pub total_orders: i64,
    /// Sum of quantity available over every catalog item
    pub total_glassware: i64,
    pub pending_orders: i64,
    pub total_revenue: Amount,
}

pub fn dashboard_stats(customer_count: usize, rows: &[StockRow], orders: &[Order]) -> DashboardStats {
    DashboardStats {
        total_customers: customer_count as i64,
        total_orders: orders.len() as i64,
        total_glassware: rows.iter().map(|row| i64::from(row.current_stock)).sum(),
        pending_orders: orders
            .iter()
            .filter(|order| order.status == OrderStatus::Pending)
            .count() as i64,
        total_revenue: orders
            .iter()
            .fold(0, |total: Amount, order| total.saturating_add(order.total_amount)),
    }
}

/// Inventory of one glass type across its unit groupings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCategory {
    pub glass_type: String,
    pub individual: Option<Glassware>,
    pub small_box: Option<Glassware>,
    pub large_box: Option<Glassware>,
    /// Glasses on hand across every grouping
    pub pool_glasses: i64,
    /// Glasses held by orders
    pub reserved_glasses: i64,
    pub total_glasses: i64,
    pub inventory_value: Amount,
}

/// Group stock rows by glass type, counting glasses held by orders
pub fn inventory_overview(rows: &[StockRow], orders: &[Order]) -> Vec<InventoryCategory> {
    let mut categories: BTreeMap<&str, InventoryCategory> = BTreeMap::new();

    for row in rows {
        let category = categories
            .entry(row.glass_type.as_str())
            .or_insert_with(|| InventoryCategory {
                glass_type: row.glass_type.clone(),
                individual: None,
                small_box: None,
                large_box: None,
                pool_glasses: 0,
                reserved_glasses: 0,
                total_glasses: 0,
                inventory_value: 0,
            });

        let item = row.to_glassware();
        category.pool_glasses += row.total_glasses();
        category.inventory_value = category.inventory_value.saturating_add(item.stock_value());

        let reserved: i64 = orders
            .iter()
            .filter(|order| order.glassware_id == row.id)
            .map(|order| i64::from(order.quantity) * i64::from(row.glasses_per_unit()))
            .sum();
        category.reserved_glasses += reserved;

        match row.unit_type {
            UnitType::Individual => category.individual = Some(item),
            UnitType::SmallBox => category.small_box = Some(item),
            UnitType::LargeBox => category.large_box = Some(item),
        }
    }

    categories
        .into_values()
        .map(|mut category| {
            category.total_glasses = category.pool_glasses + category.reserved_glasses;
            category
        })
        .collect()
}
