//! Order lifecycle service
//!
//! Creating, resizing and deleting an order moves stock in the same store
//! transaction as the order write. Every check happens before the write, so
//! a rejected request leaves both orders and stock untouched.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use shared::models::{
    order_total, AdjustmentType, NewOrder, Order, OrderFilter, OrderPatch, StockRow,
};
use shared::types::Amount;
use shared::validation::validate_rental_dates;

use super::{retry_on_conflict, stock::ensure_rentable};
use crate::config::StockConfig;
use crate::error::{AppError, AppResult, StoreResultExt};
use crate::store::{StockChange, Store, StoreError};

/// Total for `quantity` units of `row`, rejected when it cannot be represented
fn priced(row: &StockRow, quantity: i32) -> AppResult<Amount> {
    order_total(row.price_per_unit, quantity)
        .ok_or_else(|| AppError::validation("quantity", "Order total is too large"))
}

/// Order lifecycle service
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
    max_retries: u32,
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>, config: &StockConfig) -> Self {
        Self {
            store,
            max_retries: config.max_adjustment_retries,
        }
    }

    /// Orders matching the filter, newest first
    pub async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
        let orders = self.store.list_orders().await.during("list orders")?;
        Ok(orders.into_iter().filter(|order| filter.matches(order)).collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Order> {
        self.store.get_order(id).await.during("get order")
    }

    /// Place an order, reserving its quantity from the item's stock
    pub async fn create_order(&self, input: NewOrder) -> AppResult<Order> {
        input.validate()?;
        validate_rental_dates(input.order_date, input.delivery_date)
            .map_err(|message| AppError::validation("deliveryDate", message))?;

        let input = &input;
        retry_on_conflict("create order", self.max_retries, move || {
            self.try_create(input)
        })
        .await
    }

    async fn try_create(&self, input: &NewOrder) -> AppResult<Order> {
        let customer = self
            .store
            .get_customer(input.customer_id)
            .await
            .during("get customer")?;
        let (row, rows) = self.stock_row(input.glassware_id).await?;

        ensure_rentable(&rows, &row, input.quantity)?;
        let total_amount = priced(&row, input.quantity)?;

        let order = Order {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            customer_name: customer.name,
            glassware_id: row.id,
            glassware_type: row.catalog_type(),
            quantity: input.quantity,
            order_date: input.order_date,
            delivery_date: input.delivery_date,
            status: input.status,
            total_amount,
            created_at: Utc::now(),
        };
        let change = StockChange::against(&row, -input.quantity, AdjustmentType::Order)
            .referencing(order.id)
            .because(Some("Order placed".to_string()));

        self.store
            .insert_order(&order, &change)
            .await
            .during("insert order")?;

        tracing::info!(
            order_id = %order.id,
            glassware_id = %row.id,
            quantity = order.quantity,
            "Order created"
        );
        Ok(order)
    }

    /// Merge the provided fields into an order
    ///
    /// A quantity change moves the difference between the old and new
    /// quantity back to or out of stock and recomputes the total.
    pub async fn update_order(&self, id: Uuid, patch: OrderPatch) -> AppResult<Order> {
        patch.validate()?;

        let patch = &patch;
        retry_on_conflict("update order", self.max_retries, move || {
            self.try_update(id, patch)
        })
        .await
    }

    async fn try_update(&self, id: Uuid, patch: &OrderPatch) -> AppResult<Order> {
        let existing = self.get(id).await?;

        if patch
            .glassware_id
            .map_or(false, |glassware_id| glassware_id != existing.glassware_id)
        {
            return Err(AppError::validation(
                "glasswareId",
                "The rented item of an order cannot change; delete and re-create the order",
            ));
        }

        let mut updated = existing.clone();

        if let Some(customer_id) = patch.customer_id.filter(|id| *id != existing.customer_id) {
            let customer = self
                .store
                .get_customer(customer_id)
                .await
                .during("get customer")?;
            updated.customer_id = customer.id;
            updated.customer_name = customer.name;
        }
        if let Some(order_date) = patch.order_date {
            updated.order_date = order_date;
        }
        if let Some(delivery_date) = patch.delivery_date {
            updated.delivery_date = delivery_date;
        }
        if let Some(status) = patch.status {
            updated.status = status;
        }
        validate_rental_dates(updated.order_date, updated.delivery_date)
            .map_err(|message| AppError::validation("deliveryDate", message))?;

        let mut change = None;
        if let Some(quantity) = patch.quantity.filter(|q| *q != existing.quantity) {
            let (row, rows) = self.stock_row(existing.glassware_id).await?;
            // positive returns stock, negative consumes more
            let delta = existing.quantity - quantity;
            if delta < 0 {
                ensure_rentable(&rows, &row, -delta)?;
            }
            let adjustment_type = if delta > 0 {
                AdjustmentType::Return
            } else {
                AdjustmentType::Order
            };
            change = Some(
                StockChange::against(&row, delta, adjustment_type)
                    .referencing(id)
                    .because(Some("Order quantity changed".to_string())),
            );
            updated.quantity = quantity;
            updated.total_amount = priced(&row, quantity)?;
        }

        self.store
            .update_order(&updated, existing.quantity, change.as_ref())
            .await
            .during("update order")?;

        tracing::info!(
            order_id = %id,
            quantity = updated.quantity,
            status = %updated.status,
            "Order updated"
        );
        Ok(updated)
    }

    /// Delete an order, returning its quantity to stock
    ///
    /// A second delete of the same order fails with not found and credits nothing.
    pub async fn delete_order(&self, id: Uuid) -> AppResult<()> {
        retry_on_conflict("delete order", self.max_retries, move || self.try_delete(id)).await
    }

    async fn try_delete(&self, id: Uuid) -> AppResult<()> {
        let order = self.get(id).await?;
        let (row, _) = self.stock_row(order.glassware_id).await?;

        let change = StockChange::against(&row, order.quantity, AdjustmentType::Return)
            .referencing(order.id)
            .because(Some("Order deleted".to_string()));

        self.store
            .delete_order(order.id, order.quantity, &change)
            .await
            .during("delete order")?;

        tracing::info!(order_id = %id, returned = order.quantity, "Order deleted");
        Ok(())
    }

    /// The stock row behind a catalog item, with every row for pool accounting
    async fn stock_row(&self, glassware_id: Uuid) -> AppResult<(StockRow, Vec<StockRow>)> {
        let rows = self.store.list_stock_rows().await.during("list stock items")?;
        let row = rows
            .iter()
            .find(|row| row.id == glassware_id)
            .cloned()
            .ok_or(StoreError::NotFound("Glassware"))
            .during("get glassware")?;
        Ok((row, rows))
    }
}
