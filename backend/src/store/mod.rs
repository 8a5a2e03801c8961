//! Persistence adapter
//!
//! Services depend on the [`Store`] trait only. Multi-row operations (an order
//! write plus its stock change, a cascade delete plus the stock it releases)
//! are single calls so that each implementation can make them atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use shared::models::{
    AdjustmentType, Customer, CustomerPatch, Order, StockAdjustment, StockRow, UnitType,
};
use shared::types::Amount;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("duplicate {0}")]
    DuplicateKey(String),

    /// A compare-and-set guard did not hold
    #[error("{0} changed concurrently")]
    Conflict(&'static str),

    #[error("check constraint {0} violated")]
    CheckViolation(String),

    #[error("timed out during {0}")]
    Timeout(&'static str),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A guarded change to one stock row, recorded as one audit entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    pub stock_item_id: Uuid,
    /// `current_stock` the caller read; the change applies only if it still holds
    pub expected_stock: i32,
    pub quantity_change: i32,
    pub adjustment_type: AdjustmentType,
    pub reference_id: Option<Uuid>,
    pub reason: Option<String>,
}

impl StockChange {
    pub fn against(row: &StockRow, quantity_change: i32, adjustment_type: AdjustmentType) -> Self {
        Self {
            stock_item_id: row.id,
            expected_stock: row.current_stock,
            quantity_change,
            adjustment_type,
            reference_id: None,
            reason: None,
        }
    }

    pub fn referencing(mut self, reference_id: Uuid) -> Self {
        self.reference_id = Some(reference_id);
        self
    }

    pub fn because(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub(crate) fn audit_record(&self, at: DateTime<Utc>) -> StockAdjustment {
        StockAdjustment {
            id: Uuid::new_v4(),
            stock_item_id: self.stock_item_id,
            adjustment_type: self.adjustment_type,
            quantity_change: self.quantity_change,
            reference_id: self.reference_id,
            reason: self.reason.clone(),
            created_at: at,
        }
    }
}

/// Field changes for a stock row other than its stock level
#[derive(Debug, Clone, Default)]
pub struct StockRowPatch {
    pub glass_type: Option<String>,
    pub description: Option<String>,
    pub price_per_unit: Option<Amount>,
    pub low_stock_threshold: Option<i32>,
}

/// Stored login identity
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A signed-in session; tokens are bound to one
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // Customers

    /// Newest first
    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;
    async fn get_customer(&self, id: Uuid) -> StoreResult<Customer>;
    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()>;
    async fn update_customer(&self, id: Uuid, patch: &CustomerPatch) -> StoreResult<Customer>;
    /// Removes the customer and its orders, returning their stock; yields the removed orders
    async fn delete_customer(&self, id: Uuid) -> StoreResult<Vec<Order>>;

    // Stock rows and catalog items

    async fn list_stock_rows(&self) -> StoreResult<Vec<StockRow>>;
    async fn get_stock_row(&self, id: Uuid) -> StoreResult<StockRow>;
    async fn find_stock_row(
        &self,
        glass_type: &str,
        unit_type: UnitType,
    ) -> StoreResult<Option<StockRow>>;
    async fn insert_stock_row(&self, row: &StockRow) -> StoreResult<()>;
    async fn update_stock_row(
        &self,
        id: Uuid,
        patch: &StockRowPatch,
        change: Option<&StockChange>,
    ) -> StoreResult<StockRow>;
    /// Removes the row and its orders; audit history is kept
    async fn delete_stock_row(&self, id: Uuid) -> StoreResult<Vec<Order>>;
    async fn apply_stock_change(
        &self,
        change: &StockChange,
    ) -> StoreResult<(StockRow, StockAdjustment)>;
    /// Newest first
    async fn list_adjustments(
        &self,
        stock_item_id: Option<Uuid>,
    ) -> StoreResult<Vec<StockAdjustment>>;

    // Orders

    /// Newest first
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    async fn get_order(&self, id: Uuid) -> StoreResult<Order>;
    async fn insert_order(&self, order: &Order, change: &StockChange) -> StoreResult<()>;
    /// Replaces the stored order if its quantity is still `expected_quantity`
    async fn update_order(
        &self,
        order: &Order,
        expected_quantity: i32,
        change: Option<&StockChange>,
    ) -> StoreResult<()>;
    async fn delete_order(
        &self,
        id: Uuid,
        expected_quantity: i32,
        change: &StockChange,
    ) -> StoreResult<()>;

    // Identity

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>>;
    async fn insert_user(&self, user: &UserAccount) -> StoreResult<()>;
    async fn insert_session(&self, session: &Session) -> StoreResult<()>;
    async fn get_session(&self, id: Uuid) -> StoreResult<Option<Session>>;
    /// Returns false when the session was unknown or already revoked
    async fn revoke_session(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<bool>;

    async fn ping(&self) -> StoreResult<()>;
}
