//! Reporting service for dashboards and data export

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use shared::models::{
    dashboard_stats, inventory_overview, DashboardStats, InventoryCategory, StockRow,
};
use shared::types::Amount;

use crate::error::{AppError, AppResult, StoreResultExt};
use crate::store::Store;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    store: Arc<dyn Store>,
}

/// A flat report row with a fixed CSV heading
pub trait ReportRow: Serialize {
    const HEADERS: &'static [&'static str];
}

/// Customer report row
#[derive(Debug, Clone, Serialize)]
pub struct CustomerReportRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Event Type")]
    pub event_type: String,
    #[serde(rename = "Event Date")]
    pub event_date: NaiveDate,
    #[serde(rename = "Event Location")]
    pub event_location: String,
    #[serde(rename = "Created At")]
    pub created_at: NaiveDate,
}

/// Inventory report row
#[derive(Debug, Clone, Serialize)]
pub struct InventoryReportRow {
    #[serde(rename = "Type")]
    pub glassware_type: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Quantity Available")]
    pub quantity_available: i32,
    #[serde(rename = "Price per Unit")]
    pub price_per_unit: Amount,
    #[serde(rename = "Total Value")]
    pub total_value: Amount,
    #[serde(rename = "Created At")]
    pub created_at: NaiveDate,
}

/// Order report row
#[derive(Debug, Clone, Serialize)]
pub struct OrderReportRow {
    #[serde(rename = "Order ID")]
    pub order_id: Uuid,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Glassware Type")]
    pub glassware_type: String,
    #[serde(rename = "Quantity")]
    pub quantity: i32,
    #[serde(rename = "Order Date")]
    pub order_date: NaiveDate,
    #[serde(rename = "Delivery Date")]
    pub delivery_date: NaiveDate,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Total Amount")]
    pub total_amount: Amount,
    #[serde(rename = "Created At")]
    pub created_at: NaiveDate,
}

impl ReportRow for CustomerReportRow {
    const HEADERS: &'static [&'static str] = &[
        "Name",
        "Email",
        "Phone",
        "Event Type",
        "Event Date",
        "Event Location",
        "Created At",
    ];
}

impl ReportRow for InventoryReportRow {
    const HEADERS: &'static [&'static str] = &[
        "Type",
        "Description",
        "Quantity Available",
        "Price per Unit",
        "Total Value",
        "Created At",
    ];
}

impl ReportRow for OrderReportRow {
    const HEADERS: &'static [&'static str] = &[
        "Order ID",
        "Customer Name",
        "Glassware Type",
        "Quantity",
        "Order Date",
        "Delivery Date",
        "Status",
        "Total Amount",
        "Created At",
    ];
}

/// Record counts and totals shown alongside the downloadable reports
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub customer_count: usize,
    pub glassware_count: usize,
    pub order_count: usize,
    pub total_inventory_value: Amount,
    pub total_revenue: Amount,
}

impl ReportingService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Get dashboard figures
    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let customers = self.store.list_customers().await.during("list customers")?;
        let rows = self.store.list_stock_rows().await.during("list stock items")?;
        let orders = self.store.list_orders().await.during("list orders")?;
        Ok(dashboard_stats(customers.len(), &rows, &orders))
    }

    /// Stock grouped by glass type
    pub async fn inventory_overview(&self) -> AppResult<Vec<InventoryCategory>> {
        let rows = self.store.list_stock_rows().await.during("list stock items")?;
        let orders = self.store.list_orders().await.during("list orders")?;
        Ok(inventory_overview(&rows, &orders))
    }

    pub async fn report_summary(&self) -> AppResult<ReportSummary> {
        let customers = self.store.list_customers().await.during("list customers")?;
        let rows = self.store.list_stock_rows().await.during("list stock items")?;
        let orders = self.store.list_orders().await.during("list orders")?;
        Ok(ReportSummary {
            customer_count: customers.len(),
            glassware_count: rows.len(),
            order_count: orders.len(),
            total_inventory_value: rows.iter().fold(0, |total: Amount, row| {
                total.saturating_add(row.to_glassware().stock_value())
            }),
            total_revenue: orders
                .iter()
                .fold(0, |total: Amount, order| total.saturating_add(order.total_amount)),
        })
    }

    pub async fn customers_report(&self) -> AppResult<Vec<CustomerReportRow>> {
        let customers = self.store.list_customers().await.during("list customers")?;
        Ok(customers
            .into_iter()
            .map(|customer| CustomerReportRow {
                name: customer.name,
                email: customer.email,
                phone: customer.phone,
                event_type: customer.event_type,
                event_date: customer.event_date,
                event_location: customer.event_location,
                created_at: customer.created_at.date_naive(),
            })
            .collect())
    }

    pub async fn inventory_report(&self) -> AppResult<Vec<InventoryReportRow>> {
        let rows = self.store.list_stock_rows().await.during("list stock items")?;
        let mut items: Vec<_> = rows.iter().map(StockRow::to_glassware).collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items
            .into_iter()
            .map(|item| InventoryReportRow {
                total_value: item.stock_value(),
                glassware_type: item.glassware_type,
                description: item.description,
                quantity_available: item.quantity_available,
                price_per_unit: item.price_per_unit,
                created_at: item.created_at.date_naive(),
            })
            .collect())
    }

    pub async fn orders_report(&self) -> AppResult<Vec<OrderReportRow>> {
        let orders = self.store.list_orders().await.during("list orders")?;
        Ok(orders
            .into_iter()
            .map(|order| OrderReportRow {
                order_id: order.id,
                customer_name: order.customer_name,
                glassware_type: order.glassware_type,
                quantity: order.quantity,
                order_date: order.order_date,
                delivery_date: order.delivery_date,
                status: order.status.to_string(),
                total_amount: order.total_amount,
                created_at: order.created_at.date_naive(),
            })
            .collect())
    }

    /// Export report data as CSV; the header row is written even when there is no data
    pub fn export_to_csv<T: ReportRow>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        wtr.write_record(T::HEADERS)
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }

    /// Strong entity tag for an exported document
    pub fn content_digest(body: &str) -> String {
        let digest = Sha256::digest(body.as_bytes());
        format!("\"{}\"", BASE64.encode(digest))
    }
}
