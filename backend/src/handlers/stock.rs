//! HTTP handlers for stock accounting endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::models::{StockAdjustment, StockAlert, StockForOrder, StockItem};

use crate::error::AppResult;
use crate::services::stock::{
    AdjustStockInput, AdjustmentOutcome, AvailableGlasses, StockMovementInput,
};
use crate::services::StockService;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentQuery {
    pub stock_item_id: Option<Uuid>,
}

fn stock_service(state: AppState) -> StockService {
    StockService::new(state.store, &state.config.stock)
}

/// All stock rows with derived values
pub async fn get_stock_overview(State(state): State<AppState>) -> AppResult<Json<Vec<StockItem>>> {
    Ok(Json(stock_service(state).get_stock_overview().await?))
}

pub async fn get_stock_for_orders(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StockForOrder>>> {
    Ok(Json(stock_service(state).get_stock_for_orders().await?))
}

pub async fn get_stock_alerts(State(state): State<AppState>) -> AppResult<Json<Vec<StockAlert>>> {
    Ok(Json(stock_service(state).get_active_alerts().await?))
}

pub async fn get_available_glasses(
    State(state): State<AppState>,
    Path(glass_type): Path<String>,
) -> AppResult<Json<AvailableGlasses>> {
    Ok(Json(
        stock_service(state).get_available_glasses(&glass_type).await?,
    ))
}

/// Audit history, optionally for one stock item
pub async fn list_stock_adjustments(
    State(state): State<AppState>,
    Query(query): Query<AdjustmentQuery>,
) -> AppResult<Json<Vec<StockAdjustment>>> {
    Ok(Json(
        stock_service(state)
            .get_stock_adjustments(query.stock_item_id)
            .await?,
    ))
}

pub async fn adjust_stock(
    State(state): State<AppState>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<AdjustmentOutcome>> {
    Ok(Json(stock_service(state).adjust_stock(input).await?))
}

pub async fn restock_item(
    State(state): State<AppState>,
    Json(input): Json<StockMovementInput>,
) -> AppResult<Json<AdjustmentOutcome>> {
    Ok(Json(stock_service(state).restock_item(input).await?))
}

pub async fn report_damage(
    State(state): State<AppState>,
    Json(input): Json<StockMovementInput>,
) -> AppResult<Json<AdjustmentOutcome>> {
    Ok(Json(stock_service(state).report_damage(input).await?))
}
