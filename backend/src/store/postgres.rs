//! PostgreSQL store
//!
//! Rows are snake_case records converted to the shared entities at this
//! boundary. Enum columns are TEXT and parsed with `FromStr`.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgConnection, PgPool};
use uuid::Uuid;

use shared::models::{
    AdjustmentType, Customer, CustomerPatch, Order, StockAdjustment, StockRow, UnitType,
};

use super::{
    Session, StockChange, StockRowPatch, Store, StoreError, StoreResult, UserAccount,
};
use crate::config::DatabaseConfig;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.code().as_deref() {
                Some("23505") => return StoreError::DuplicateKey(duplicate_field(&constraint)),
                Some("23514") => return StoreError::CheckViolation(constraint),
                Some("23503") => return StoreError::NotFound(missing_parent(&constraint)),
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

fn duplicate_field(constraint: &str) -> String {
    match constraint {
        "customers_email_key" | "user_accounts_email_key" => "email".to_string(),
        "stock_items_glass_type_unit_type_key" => "type".to_string(),
        other => other.to_string(),
    }
}

fn missing_parent(constraint: &str) -> &'static str {
    match constraint {
        "orders_customer_id_fkey" => "Customer",
        "orders_glassware_id_fkey" => "Glassware",
        "sessions_user_id_fkey" => "User",
        _ => "Referenced record",
    }
}

fn decode_error(err: shared::types::UnknownVariant) -> StoreError {
    StoreError::Database(sqlx::Error::Decode(Box::new(err)))
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    event_date: NaiveDate,
    event_location: String,
    event_type: String,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            event_date: row.event_date,
            event_location: row.event_location,
            event_type: row.event_type,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StockItemRow {
    id: Uuid,
    glass_type: String,
    unit_type: String,
    description: String,
    price_per_unit: i64,
    current_stock: i32,
    low_stock_threshold: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StockItemRow> for StockRow {
    type Error = StoreError;

    fn try_from(row: StockItemRow) -> Result<Self, Self::Error> {
        Ok(StockRow {
            id: row.id,
            glass_type: row.glass_type,
            unit_type: row.unit_type.parse().map_err(decode_error)?,
            description: row.description,
            price_per_unit: row.price_per_unit,
            current_stock: row.current_stock,
            low_stock_threshold: row.low_stock_threshold,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AdjustmentRow {
    id: Uuid,
    stock_item_id: Uuid,
    adjustment_type: String,
    quantity_change: i32,
    reference_id: Option<Uuid>,
    reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdjustmentRow> for StockAdjustment {
    type Error = StoreError;

    fn try_from(row: AdjustmentRow) -> Result<Self, Self::Error> {
        Ok(StockAdjustment {
            id: row.id,
            stock_item_id: row.stock_item_id,
            adjustment_type: row.adjustment_type.parse().map_err(decode_error)?,
            quantity_change: row.quantity_change,
            reference_id: row.reference_id,
            reason: row.reason,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Uuid,
    customer_name: String,
    glassware_id: Uuid,
    glassware_type: String,
    quantity: i32,
    order_date: NaiveDate,
    delivery_date: NaiveDate,
    status: String,
    total_amount: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            glassware_id: row.glassware_id,
            glassware_type: row.glassware_type,
            quantity: row.quantity,
            order_date: row.order_date,
            delivery_date: row.delivery_date,
            status: row.status.parse().map_err(decode_error)?,
            total_amount: row.total_amount,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        UserAccount {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            full_name: row.full_name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
            expires_at: row.expires_at,
            revoked_at: row.revoked_at,
        }
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

// ============================================================================
// Transaction steps
// ============================================================================

/// Compare-and-set on `current_stock` plus the audit record, inside a transaction
async fn apply_change(
    conn: &mut PgConnection,
    change: &StockChange,
) -> StoreResult<(StockRow, StockAdjustment)> {
    let updated = sqlx::query_as::<_, StockItemRow>(
        r#"
        UPDATE stock_items
        SET current_stock = current_stock + $3, updated_at = NOW()
        WHERE id = $1 AND current_stock = $2
        RETURNING *
        "#,
    )
    .bind(change.stock_item_id)
    .bind(change.expected_stock)
    .bind(change.quantity_change)
    .fetch_optional(&mut *conn)
    .await?;

    let row = match updated {
        Some(row) => StockRow::try_from(row)?,
        None => {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM stock_items WHERE id = $1)",
            )
            .bind(change.stock_item_id)
            .fetch_one(&mut *conn)
            .await?;
            return Err(if exists {
                StoreError::Conflict("Stock item")
            } else {
                StoreError::NotFound("Stock item")
            });
        }
    };

    let adjustment = record_adjustment(conn, change).await?;
    Ok((row, adjustment))
}

/// Unconditional credit used by cascade deletes, which already hold the order rows
async fn release_order(conn: &mut PgConnection, order: &Order, reason: &str) -> StoreResult<()> {
    let result = sqlx::query(
        "UPDATE stock_items SET current_stock = current_stock + $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(order.glassware_id)
    .bind(order.quantity)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() > 0 {
        let change = StockChange {
            stock_item_id: order.glassware_id,
            expected_stock: 0,
            quantity_change: order.quantity,
            adjustment_type: AdjustmentType::Return,
            reference_id: Some(order.id),
            reason: Some(reason.to_string()),
        };
        record_adjustment(conn, &change).await?;
    }
    Ok(())
}

async fn record_adjustment(
    conn: &mut PgConnection,
    change: &StockChange,
) -> StoreResult<StockAdjustment> {
    let row = sqlx::query_as::<_, AdjustmentRow>(
        r#"
        INSERT INTO stock_adjustments
            (id, stock_item_id, adjustment_type, quantity_change, reference_id, reason)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(change.stock_item_id)
    .bind(change.adjustment_type.as_str())
    .bind(change.quantity_change)
    .bind(change.reference_id)
    .bind(&change.reason)
    .fetch_one(&mut *conn)
    .await?;
    StockAdjustment::try_from(row)
}

/// Distinguish a vanished order from one whose quantity moved underneath us
async fn missing_or_conflicting_order(conn: &mut PgConnection, id: Uuid) -> StoreError {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await;
    match exists {
        Ok(true) => StoreError::Conflict("Order"),
        Ok(false) => StoreError::NotFound("Order"),
        Err(err) => err.into(),
    }
}

// ============================================================================
// Store
// ============================================================================

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    statement_timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    /// Open a connection pool sized and bounded by the database settings
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool, config.statement_timeout()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn bounded<T, F>(&self, step: &'static str, operation: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>> + Send,
    {
        match tokio::time::timeout(self.statement_timeout, operation).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(step, "store operation timed out");
                Err(StoreError::Timeout(step))
            }
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        self.bounded("list customers", async {
            let rows = sqlx::query_as::<_, CustomerRow>(
                "SELECT * FROM customers ORDER BY created_at DESC",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(rows.into_iter().map(Customer::from).collect())
        })
        .await
    }

    async fn get_customer(&self, id: Uuid) -> StoreResult<Customer> {
        self.bounded("get customer", async {
            sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(Customer::from)
                .ok_or(StoreError::NotFound("Customer"))
        })
        .await
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        self.bounded("insert customer", async {
            sqlx::query(
                r#"
                INSERT INTO customers
                    (id, name, email, phone, event_date, event_location, event_type, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.phone)
            .bind(customer.event_date)
            .bind(&customer.event_location)
            .bind(&customer.event_type)
            .bind(customer.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    async fn update_customer(&self, id: Uuid, patch: &CustomerPatch) -> StoreResult<Customer> {
        self.bounded("update customer", async {
            sqlx::query_as::<_, CustomerRow>(
                r#"
                UPDATE customers SET
                    name = COALESCE($2, name),
                    email = COALESCE($3, email),
                    phone = COALESCE($4, phone),
                    event_date = COALESCE($5, event_date),
                    event_location = COALESCE($6, event_location),
                    event_type = COALESCE($7, event_type)
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.email)
            .bind(&patch.phone)
            .bind(patch.event_date)
            .bind(&patch.event_location)
            .bind(&patch.event_type)
            .fetch_optional(&self.pool)
            .await?
            .map(Customer::from)
            .ok_or(StoreError::NotFound("Customer"))
        })
        .await
    }

    async fn delete_customer(&self, id: Uuid) -> StoreResult<Vec<Order>> {
        self.bounded("delete customer", async {
            let mut tx = self.pool.begin().await?;

            let orders: Vec<Order> = convert_all(
                sqlx::query_as::<_, OrderRow>(
                    "SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at FOR UPDATE",
                )
                .bind(id)
                .fetch_all(&mut *tx)
                .await?,
            )?;

            for order in &orders {
                release_order(&mut tx, order, "Customer deleted").await?;
            }

            // orders go with the customer through ON DELETE CASCADE
            let deleted = sqlx::query("DELETE FROM customers WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if deleted.rows_affected() == 0 {
                return Err(StoreError::NotFound("Customer"));
            }

            tx.commit().await?;
            Ok(orders)
        })
        .await
    }

    async fn list_stock_rows(&self) -> StoreResult<Vec<StockRow>> {
        self.bounded("list stock items", async {
            convert_all(
                sqlx::query_as::<_, StockItemRow>(
                    "SELECT * FROM stock_items ORDER BY glass_type, created_at",
                )
                .fetch_all(&self.pool)
                .await?,
            )
        })
        .await
    }

    async fn get_stock_row(&self, id: Uuid) -> StoreResult<StockRow> {
        self.bounded("get stock item", async {
            sqlx::query_as::<_, StockItemRow>("SELECT * FROM stock_items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StoreError::NotFound("Stock item"))
                .and_then(StockRow::try_from)
        })
        .await
    }

    async fn find_stock_row(
        &self,
        glass_type: &str,
        unit_type: UnitType,
    ) -> StoreResult<Option<StockRow>> {
        self.bounded("find stock item", async {
            sqlx::query_as::<_, StockItemRow>(
                "SELECT * FROM stock_items WHERE glass_type = $1 AND unit_type = $2",
            )
            .bind(glass_type)
            .bind(unit_type.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(StockRow::try_from)
            .transpose()
        })
        .await
    }

    async fn insert_stock_row(&self, row: &StockRow) -> StoreResult<()> {
        self.bounded("insert stock item", async {
            sqlx::query(
                r#"
                INSERT INTO stock_items
                    (id, glass_type, unit_type, description, price_per_unit,
                     current_stock, low_stock_threshold, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(row.id)
            .bind(&row.glass_type)
            .bind(row.unit_type.as_str())
            .bind(&row.description)
            .bind(row.price_per_unit)
            .bind(row.current_stock)
            .bind(row.low_stock_threshold)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
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
        self.bounded("update stock item", async {
            let mut tx = self.pool.begin().await?;

            if let Some(change) = change {
                apply_change(&mut tx, change).await?;
            }

            let row = sqlx::query_as::<_, StockItemRow>(
                r#"
                UPDATE stock_items SET
                    glass_type = COALESCE($2, glass_type),
                    description = COALESCE($3, description),
                    price_per_unit = COALESCE($4, price_per_unit),
                    low_stock_threshold = COALESCE($5, low_stock_threshold),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(&patch.glass_type)
            .bind(&patch.description)
            .bind(patch.price_per_unit)
            .bind(patch.low_stock_threshold)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("Glassware"))?;

            tx.commit().await?;
            StockRow::try_from(row)
        })
        .await
    }

    async fn delete_stock_row(&self, id: Uuid) -> StoreResult<Vec<Order>> {
        self.bounded("delete stock item", async {
            let mut tx = self.pool.begin().await?;

            let orders: Vec<Order> = convert_all(
                sqlx::query_as::<_, OrderRow>(
                    "SELECT * FROM orders WHERE glassware_id = $1 ORDER BY created_at FOR UPDATE",
                )
                .bind(id)
                .fetch_all(&mut *tx)
                .await?,
            )?;

            let deleted = sqlx::query("DELETE FROM stock_items WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if deleted.rows_affected() == 0 {
                return Err(StoreError::NotFound("Glassware"));
            }

            tx.commit().await?;
            Ok(orders)
        })
        .await
    }

    async fn apply_stock_change(
        &self,
        change: &StockChange,
    ) -> StoreResult<(StockRow, StockAdjustment)> {
        self.bounded("apply stock change", async {
            let mut tx = self.pool.begin().await?;
            let applied = apply_change(&mut tx, change).await?;
            tx.commit().await?;
            Ok(applied)
        })
        .await
    }

    async fn list_adjustments(
        &self,
        stock_item_id: Option<Uuid>,
    ) -> StoreResult<Vec<StockAdjustment>> {
        self.bounded("list stock adjustments", async {
            convert_all(
                sqlx::query_as::<_, AdjustmentRow>(
                    r#"
                    SELECT * FROM stock_adjustments
                    WHERE $1::uuid IS NULL OR stock_item_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(stock_item_id)
                .fetch_all(&self.pool)
                .await?,
            )
        })
        .await
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        self.bounded("list orders", async {
            convert_all(
                sqlx::query_as::<_, OrderRow>("SELECT * FROM orders ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    async fn get_order(&self, id: Uuid) -> StoreResult<Order> {
        self.bounded("get order", async {
            sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StoreError::NotFound("Order"))
                .and_then(Order::try_from)
        })
        .await
    }

    async fn insert_order(&self, order: &Order, change: &StockChange) -> StoreResult<()> {
        self.bounded("insert order", async {
            let mut tx = self.pool.begin().await?;

            sqlx::query(
                r#"
                INSERT INTO orders
                    (id, customer_id, customer_name, glassware_id, glassware_type, quantity,
                     order_date, delivery_date, status, total_amount, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(order.id)
            .bind(order.customer_id)
            .bind(&order.customer_name)
            .bind(order.glassware_id)
            .bind(&order.glassware_type)
            .bind(order.quantity)
            .bind(order.order_date)
            .bind(order.delivery_date)
            .bind(order.status.as_str())
            .bind(order.total_amount)
            .bind(order.created_at)
            .execute(&mut *tx)
            .await?;

            apply_change(&mut tx, change).await?;

            tx.commit().await?;
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
        self.bounded("update order", async {
            let mut tx = self.pool.begin().await?;

            let updated = sqlx::query(
                r#"
                UPDATE orders SET
                    customer_id = $2,
                    customer_name = $3,
                    quantity = $4,
                    order_date = $5,
                    delivery_date = $6,
                    status = $7,
                    total_amount = $8
                WHERE id = $1 AND quantity = $9
                "#,
            )
            .bind(order.id)
            .bind(order.customer_id)
            .bind(&order.customer_name)
            .bind(order.quantity)
            .bind(order.order_date)
            .bind(order.delivery_date)
            .bind(order.status.as_str())
            .bind(order.total_amount)
            .bind(expected_quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(missing_or_conflicting_order(&mut tx, order.id).await);
            }

            if let Some(change) = change {
                apply_change(&mut tx, change).await?;
            }

            tx.commit().await?;
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
        self.bounded("delete order", async {
            let mut tx = self.pool.begin().await?;

            let deleted = sqlx::query("DELETE FROM orders WHERE id = $1 AND quantity = $2")
                .bind(id)
                .bind(expected_quantity)
                .execute(&mut *tx)
                .await?;

            if deleted.rows_affected() == 0 {
                return Err(missing_or_conflicting_order(&mut tx, id).await);
            }

            apply_change(&mut tx, change).await?;

            tx.commit().await?;
            Ok(())
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        self.bounded("find user", async {
            Ok(sqlx::query_as::<_, UserRow>(
                "SELECT * FROM user_accounts WHERE lower(email) = lower($1)",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(UserAccount::from))
        })
        .await
    }

    async fn insert_user(&self, user: &UserAccount) -> StoreResult<()> {
        self.bounded("insert user", async {
            sqlx::query(
                r#"
                INSERT INTO user_accounts (id, email, password_hash, full_name, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.full_name)
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    async fn insert_session(&self, session: &Session) -> StoreResult<()> {
        self.bounded("insert session", async {
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM sessions WHERE expires_at <= $1 OR revoked_at IS NOT NULL")
                .bind(session.created_at)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO sessions (id, user_id, created_at, expires_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(session.id)
            .bind(session.user_id)
            .bind(session.created_at)
            .bind(session.expires_at)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(())
        })
        .await
    }

    async fn get_session(&self, id: Uuid) -> StoreResult<Option<Session>> {
        self.bounded("get session", async {
            Ok(
                sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .map(Session::from),
            )
        })
        .await
    }

    async fn revoke_session(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<bool> {
        self.bounded("revoke session", async {
            let result = sqlx::query(
                "UPDATE sessions SET revoked_at = $2 WHERE id = $1 AND revoked_at IS NULL",
            )
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.bounded("ping", async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
        .await
    }
}
