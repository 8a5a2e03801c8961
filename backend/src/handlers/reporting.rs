//! Reporting handlers for dashboards and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use shared::models::{DashboardStats, InventoryCategory};

use crate::error::AppResult;
use crate::services::reporting::{ReportRow, ReportSummary};
use crate::services::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Render report rows as JSON or as a CSV download
fn report_response<T: ReportRow>(
    rows: Vec<T>,
    format: Option<&str>,
    filename: &str,
) -> AppResult<Response> {
    if format == Some("csv") {
        let csv = ReportingService::export_to_csv(&rows)?;
        let etag = ReportingService::content_digest(&csv);
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.csv\"", filename),
                ),
                (header::ETAG, etag),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(rows).into_response())
    }
}

/// Get dashboard figures
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let service = ReportingService::new(state.store);
    Ok(Json(service.dashboard_stats().await?))
}

pub async fn get_inventory_overview(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryCategory>>> {
    let service = ReportingService::new(state.store);
    Ok(Json(service.inventory_overview().await?))
}

pub async fn get_report_summary(State(state): State<AppState>) -> AppResult<Json<ReportSummary>> {
    let service = ReportingService::new(state.store);
    Ok(Json(service.report_summary().await?))
}

pub async fn get_customers_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.store);
    let rows = service.customers_report().await?;
    report_response(rows, query.format.as_deref(), "customers-report")
}

pub async fn get_inventory_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.store);
    let rows = service.inventory_report().await?;
    report_response(rows, query.format.as_deref(), "inventory-report")
}

pub async fn get_orders_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.store);
    let rows = service.orders_report().await?;
    report_response(rows, query.format.as_deref(), "orders-report")
}
