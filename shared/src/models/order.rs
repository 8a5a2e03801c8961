//! Rental order models

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::{Amount, SearchTerm, UnknownVariant};

/// Order status; transitions between statuses are not restricted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Delivered,
    Returned,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Returned => "returned",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "delivered" => Ok(OrderStatus::Delivered),
            "returned" => Ok(OrderStatus::Returned),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownVariant::new("order status", other)),
        }
    }
}

/// A rental order for one catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Display snapshot; `customer_id` is authoritative
    pub customer_name: String,
    pub glassware_id: Uuid,
    /// Display snapshot; `glassware_id` is authoritative
    pub glassware_type: String,
    /// Denominated in the ordered item's unit
    pub quantity: i32,
    pub order_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub total_amount: Amount,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Search over customer name and glassware type
    pub fn matches_search(&self, term: &SearchTerm) -> bool {
        term.matches(&[&self.customer_name, &self.glassware_type])
    }
}

/// Input for placing an order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub glassware_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub order_date: NaiveDate,
    pub delivery_date: NaiveDate,
    #[serde(default)]
    pub status: OrderStatus,
}

/// Partial update for an order
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    pub customer_id: Option<Uuid>,
    /// Accepted only when unchanged; the rented item is fixed at creation
    pub glassware_id: Option<Uuid>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    pub order_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub status: Option<OrderStatus>,
}

/// Filter for listing orders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        let matches_search = self
            .search
            .as_deref()
            .and_then(SearchTerm::new)
            .map_or(true, |term| order.matches_search(&term));
        let matches_status = self.status.map_or(true, |status| order.status == status);
        matches_search && matches_status
    }
}

/// Order total: price of one unit times the units ordered
///
/// `None` when the product does not fit in an `Amount`.
pub fn order_total(price_per_unit: Amount, quantity: i32) -> Option<Amount> {
    price_per_unit.checked_mul(Amount::from(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(customer_name: &str, glassware_type: &str, status: OrderStatus) -> Order {
        let date = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            customer_name: customer_name.to_string(),
            glassware_id: Uuid::new_v4(),
            glassware_type: glassware_type.to_string(),
            quantity: 12,
            order_date: date,
            delivery_date: date,
            status,
            total_amount: 5_400,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_total() {
        assert_eq!(order_total(450, 12), Some(5_400));
        assert_eq!(order_total(19_200, 2), Some(38_400));
        assert_eq!(order_total(0, 10), Some(0));
        assert_eq!(order_total(Amount::MAX / 2 + 1, 2), None);
    }

    #[test]
    fn test_filter_combines_search_and_status() {
        let wedding = order("Sarah Johnson", "Wine Glass", OrderStatus::Pending);
        let corporate = order("Michael Corporation", "Beer Glass Small Box", OrderStatus::Delivered);

        let by_search = OrderFilter {
            search: Some("beer".to_string()),
            status: None,
        };
        assert!(!by_search.matches(&wedding));
        assert!(by_search.matches(&corporate));

        let by_status = OrderFilter {
            search: None,
            status: Some(OrderStatus::Pending),
        };
        assert!(by_status.matches(&wedding));
        assert!(!by_status.matches(&corporate));

        let both = OrderFilter {
            search: Some("sarah".to_string()),
            status: Some(OrderStatus::Delivered),
        };
        assert!(!both.matches(&wedding));
        assert!(OrderFilter::default().matches(&corporate));
    }

    #[test]
    fn test_status_defaults_to_pending() {
        let input: NewOrder = serde_json::from_str(&format!(
            r#"{{"customerId":"{}","glasswareId":"{}","quantity":10,"orderDate":"2024-02-10","deliveryDate":"2024-02-14"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        ))
        .unwrap();
        assert_eq!(input.status, OrderStatus::Pending);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let patch = OrderPatch {
            quantity: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
