//! In-process store
//!
//! All collections sit behind one lock. Every write runs against a staged copy
//! that replaces the live state only when the whole operation succeeds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::models::{
    AdjustmentType, Customer, CustomerPatch, Order, StockAdjustment, StockRow, UnitType,
};
use shared::validation::apply_stock_change;

use super::{
    Session, StockChange, StockRowPatch, Store, StoreError, StoreResult, UserAccount,
};

#[derive(Debug, Clone, Default)]
struct Collections {
    customers: Vec<Customer>,
    stock_rows: Vec<StockRow>,
    adjustments: Vec<StockAdjustment>,
    orders: Vec<Order>,
    users: Vec<UserAccount>,
    sessions: Vec<Session>,
}

impl Collections {
    fn stock_row_mut(&mut self, id: Uuid) -> StoreResult<&mut StockRow> {
        self.stock_rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::NotFound("Stock item"))
    }

    fn apply_change(&mut self, change: &StockChange, at: DateTime<Utc>) -> StoreResult<StockRow> {
        let row = self.stock_row_mut(change.stock_item_id)?;
        if row.current_stock != change.expected_stock {
            return Err(StoreError::Conflict("Stock item"));
        }
        row.current_stock = apply_stock_change(row.current_stock, change.quantity_change)
            .map_err(|_| StoreError::CheckViolation("stock_items_current_stock_check".into()))?;
        row.updated_at = at;
        let row = row.clone();
        self.adjustments.push(change.audit_record(at));
        Ok(row)
    }

    /// Credit back the stock held by orders that are being removed
    fn release_orders(&mut self, removed: &[Order], reason: &str, at: DateTime<Utc>) -> StoreResult<()> {
        for order in removed {
            let Some(row) = self.stock_rows.iter().find(|row| row.id == order.glassware_id) else {
                continue;
            };
            let change = StockChange::against(row, order.quantity, AdjustmentType::Return)
                .referencing(order.id)
                .because(Some(reason.to_string()));
            self.apply_change(&change, at)?;
        }
        Ok(())
    }

    fn take_orders(&mut self, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
        let (kept, removed): (Vec<Order>, Vec<Order>) = std::mem::take(&mut self.orders)
            .into_iter()
            .partition(|order| keep(order));
        self.orders = kept;
        removed
    }
}

/// Store that keeps everything in process memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn transact<T>(
        &self,
        op: impl FnOnce(&mut Collections) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut live = self.inner.write().await;
        let mut staged = live.clone();
        let value = op(&mut staged)?;
        *live = staged;
        Ok(value)
    }
}

fn newest_first<T: Clone>(items: &[T]) -> Vec<T> {
    items.iter().rev().cloned().collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(newest_first(&self.inner.read().await.customers))
    }

    async fn get_customer(&self, id: Uuid) -> StoreResult<Customer> {
        self.inner
            .read()
            .await
            .customers
            .iter()
            .find(|customer| customer.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("Customer"))
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        self.transact(|data| {
            if data.customers.iter().any(|c| c.email == customer.email) {
                return Err(StoreError::DuplicateKey("email".into()));
            }
            data.customers.push(customer.clone());
            Ok(())
        })
        .await
    }

    async fn update_customer(&self, id: Uuid, patch: &CustomerPatch) -> StoreResult<Customer> {
        self.transact(|data| {
            if let Some(email) = &patch.email {
                if data.customers.iter().any(|c| c.id != id && &c.email == email) {
                    return Err(StoreError::DuplicateKey("email".into()));
                }
            }
            let customer = data
                .customers
                .iter_mut()
                .find(|customer| customer.id == id)
                .ok_or(StoreError::NotFound("Customer"))?;
            customer.apply(patch);
            Ok(customer.clone())
        })
        .await
    }

    async fn delete_customer(&self, id: Uuid) -> StoreResult<Vec<Order>> {
        self.transact(|data| {
            let before = data.customers.len();
            data.customers.retain(|customer| customer.id != id);
            if data.customers.len() == before {
                return Err(StoreError::NotFound("Customer"));
            }
            let removed = data.take_orders(|order| order.customer_id != id);
            data.release_orders(&removed, "Customer deleted", Utc::now())?;
            Ok(removed)
        })
        .await
    }

    async fn list_stock_rows(&self) -> StoreResult<Vec<StockRow>> {
        Ok(self.inner.read().await.stock_rows.clone())
    }

    async fn get_stock_row(&self, id: Uuid) -> StoreResult<StockRow> {
        self.inner
            .read()
            .await
            .stock_rows
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("Stock item"))
    }

    async fn find_stock_row(
        &self,
        glass_type: &str,
        unit_type: UnitType,
    ) -> StoreResult<Option<StockRow>> {
        Ok(self
            .inner
            .read()
            .await
            .stock_rows
            .iter()
            .find(|row| row.glass_type == glass_type && row.unit_type == unit_type)
            .cloned())
    }

    async fn insert_stock_row(&self, row: &StockRow) -> StoreResult<()> {
        self.transact(|data| {
            let taken = data
                .stock_rows
                .iter()
                .any(|r| r.glass_type == row.glass_type && r.unit_type == row.unit_type);
            if taken {
                return Err(StoreError::DuplicateKey("type".into()));
            }
            if row.current_stock < 0 || row.low_stock_threshold < 0 {
                return Err(StoreError::CheckViolation("stock_items_check".into()));
            }
            data.stock_rows.push(row.clone());
            Ok(())
        })
        .await
    }

    async fn update_stock_row(
        &self,
        id: Uuid,
        patch: &StockRowPatch,
        change: Option<&StockChange>,
    ) -> StoreResult<StockRow> {
        self.transact(|data| {
            let now = Utc::now();
            if let Some(change) = change {
                data.apply_change(change, now)?;
            }
            if let Some(glass_type) = &patch.glass_type {
                let unit_type = data.stock_row_mut(id)?.unit_type;
                let taken = data.stock_rows.iter().any(|r| {
                    r.id != id && &r.glass_type == glass_type && r.unit_type == unit_type
                });
                if taken {
                    return Err(StoreError::DuplicateKey("type".into()));
                }
            }
            let row = data.stock_row_mut(id)?;
            if let Some(glass_type) = &patch.glass_type {
                row.glass_type = glass_type.clone();
            }
            if let Some(description) = &patch.description {
                row.description = description.clone();
            }
            if let Some(price) = patch.price_per_unit {
                row.price_per_unit = price;
            }
            if let Some(threshold) = patch.low_stock_threshold {
                row.low_stock_threshold = threshold;
            }
            row.updated_at = now;
            Ok(row.clone())
        })
        .await
    }

    async fn delete_stock_row(&self, id: Uuid) -> StoreResult<Vec<Order>> {
        self.transact(|data| {
            let before = data.stock_rows.len();
            data.stock_rows.retain(|row| row.id != id);
            if data.stock_rows.len() == before {
                return Err(StoreError::NotFound("Glassware"));
            }
            Ok(data.take_orders(|order| order.glassware_id != id))
        })
        .await
    }

    async fn apply_stock_change(
        &self,
        change: &StockChange,
    ) -> StoreResult<(StockRow, StockAdjustment)> {
        self.transact(|data| {
            let row = data.apply_change(change, Utc::now())?;
            let adjustment = data
                .adjustments
                .last()
                .cloned()
                .ok_or(StoreError::NotFound("Stock adjustment"))?;
            Ok((row, adjustment))
        })
        .await
    }

    async fn list_adjustments(
        &self,
        stock_item_id: Option<Uuid>,
    ) -> StoreResult<Vec<StockAdjustment>> {
        let data = self.inner.read().await;
        Ok(data
            .adjustments
            .iter()
            .rev()
            .filter(|adj| stock_item_id.map_or(true, |id| adj.stock_item_id == id))
            .cloned()
            .collect())
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(newest_first(&self.inner.read().await.orders))
    }

    async fn get_order(&self, id: Uuid) -> StoreResult<Order> {
        self.inner
            .read()
            .await
            .orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("Order"))
    }

    async fn insert_order(&self, order: &Order, change: &StockChange) -> StoreResult<()> {
        self.transact(|data| {
            if !data.customers.iter().any(|c| c.id == order.customer_id) {
                return Err(StoreError::NotFound("Customer"));
            }
            if !data.stock_rows.iter().any(|r| r.id == order.glassware_id) {
                return Err(StoreError::NotFound("Glassware"));
            }
            data.orders.push(order.clone());
            data.apply_change(change, Utc::now())?;
            Ok(())
        })
        .await
    }

    async fn update_order(
        &self,
        order: &Order,
        expected_quantity: i32,
        change: Option<&StockChange>,
    ) -> StoreResult<()> {
        self.transact(|data| {
            if !data.customers.iter().any(|c| c.id == order.customer_id) {
                return Err(StoreError::NotFound("Customer"));
            }
            let stored = data
                .orders
                .iter_mut()
                .find(|stored| stored.id == order.id)
                .ok_or(StoreError::NotFound("Order"))?;
            if stored.quantity != expected_quantity {
                return Err(StoreError::Conflict("Order"));
            }
            *stored = order.clone();
            if let Some(change) = change {
                data.apply_change(change, Utc::now())?;
            }
            Ok(())
        })
        .await
    }

    async fn delete_order(
        &self,
        id: Uuid,
        expected_quantity: i32,
        change: &StockChange,
    ) -> StoreResult<()> {
        self.transact(|data| {
            let position = data
                .orders
                .iter()
                .position(|order| order.id == id)
                .ok_or(StoreError::NotFound("Order"))?;
            if data.orders[position].quantity != expected_quantity {
                return Err(StoreError::Conflict("Order"));
            }
            data.orders.remove(position);
            data.apply_change(change, Utc::now())?;
            Ok(())
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_user(&self, user: &UserAccount) -> StoreResult<()> {
        self.transact(|data| {
            if data.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
                return Err(StoreError::DuplicateKey("email".into()));
            }
            data.users.push(user.clone());
            Ok(())
        })
        .await
    }

    /// Expired and revoked sessions are dropped on every insert
    async fn insert_session(&self, session: &Session) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        data.sessions.retain(|existing| existing.is_live(session.created_at));
        data.sessions.push(session.clone());
        Ok(())
    }

    async fn get_session(&self, id: Uuid) -> StoreResult<Option<Session>> {
        Ok(self
            .inner
            .read()
            .await
            .sessions
            .iter()
            .find(|session| session.id == id)
            .cloned())
    }

    async fn revoke_session(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        match data
            .sessions
            .iter_mut()
            .find(|session| session.id == id && session.revoked_at.is_none())
        {
            Some(session) => {
                session.revoked_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock_row(current_stock: i32) -> StockRow {
        StockRow {
            id: Uuid::new_v4(),
            glass_type: "Beer Glass".to_string(),
            unit_type: UnitType::Individual,
            description: String::new(),
            price_per_unit: 400,
            current_stock,
            low_stock_threshold: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_stale_stock_change_conflicts() {
        let store = MemoryStore::new();
        let row = stock_row(240);
        store.insert_stock_row(&row).await.unwrap();

        let first = StockChange::against(&row, -5, AdjustmentType::Damage);
        store.apply_stock_change(&first).await.unwrap();

        let stale = StockChange::against(&row, -5, AdjustmentType::Damage);
        let err = store.apply_stock_change(&stale).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        assert_eq!(store.get_stock_row(row.id).await.unwrap().current_stock, 235);
        assert_eq!(store.list_adjustments(None).await.unwrap().len(), 1);
    }

    fn session(created_at: DateTime<Utc>, ttl: chrono::Duration) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at,
            expires_at: created_at + ttl,
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_session_prunes_dead_sessions() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let expired = session(now - chrono::Duration::hours(2), chrono::Duration::hours(1));
        let revoked = session(now, chrono::Duration::hours(1));
        let live = session(now, chrono::Duration::hours(1));
        for s in [&expired, &revoked, &live] {
            store.insert_session(s).await.unwrap();
        }
        assert!(store.revoke_session(revoked.id, now).await.unwrap());

        let fresh = session(now, chrono::Duration::hours(1));
        store.insert_session(&fresh).await.unwrap();

        assert_eq!(store.inner.read().await.sessions.len(), 2);
        assert!(store.get_session(expired.id).await.unwrap().is_none());
        assert!(store.get_session(revoked.id).await.unwrap().is_none());
        assert!(store.get_session(live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_trace() {
        let store = MemoryStore::new();
        let row = stock_row(3);
        store.insert_stock_row(&row).await.unwrap();

        let change = StockChange::against(&row, -4, AdjustmentType::Damage);
        let err = store.apply_stock_change(&change).await.unwrap_err();
        assert!(matches!(err, StoreError::CheckViolation(_)));

        assert_eq!(store.get_stock_row(row.id).await.unwrap().current_stock, 3);
        assert!(store.list_adjustments(Some(row.id)).await.unwrap().is_empty());
    }
}
