//! Stock accounting service
//!
//! Stock is stored per (glass type, unit type) row, but availability belongs
//! to the glass type: every row of a type draws on the same pool of glasses.
//! Every change to a row's level goes through a compare-and-set store call
//! that appends exactly one audit record in the same transaction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::models::{
    active_alerts, pool_glasses, rentable_units, stock_for_orders, stock_overview,
    AdjustmentType, StockAdjustment, StockAlert, StockForOrder, StockItem, StockRow,
    StockStatus, UnitType,
};
use shared::validation::apply_stock_change;

use super::retry_on_conflict;
use crate::config::StockConfig;
use crate::error::{AppError, AppResult, StoreResultExt};
use crate::store::{StockChange, Store};

/// Stock accounting service
#[derive(Clone)]
pub struct StockService {
    store: Arc<dyn Store>,
    max_retries: u32,
}

/// Input for a signed stock adjustment
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockInput {
    #[validate(custom = "shared::validation::not_blank")]
    pub glass_type: String,
    pub unit_type: UnitType,
    pub quantity_change: i32,
    pub adjustment_type: AdjustmentType,
    pub reason: Option<String>,
}

/// Input for restocking or writing off a number of units
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementInput {
    #[validate(custom = "shared::validation::not_blank")]
    pub glass_type: String,
    pub unit_type: UnitType,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub reason: Option<String>,
}

/// Stock row state after an adjustment, with its audit record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentOutcome {
    pub stock_item_id: Uuid,
    pub glass_type: String,
    pub unit_type: UnitType,
    pub previous_stock: i32,
    pub current_stock: i32,
    pub stock_status: StockStatus,
    pub adjustment: StockAdjustment,
}

/// Glasses rentable for one glass type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableGlasses {
    pub glass_type: String,
    pub available_glasses: i64,
}

/// Fail unless `requested` units can be rented through `row`
pub(crate) fn ensure_rentable(rows: &[StockRow], row: &StockRow, requested: i32) -> AppResult<()> {
    let available = rentable_units(row, pool_glasses(rows, &row.glass_type));
    if requested > available {
        return Err(AppError::InsufficientStock {
            glassware_type: row.catalog_type(),
            requested,
            available,
        });
    }
    Ok(())
}

impl StockService {
    pub fn new(store: Arc<dyn Store>, config: &StockConfig) -> Self {
        Self {
            store,
            max_retries: config.max_adjustment_retries,
        }
    }

    /// Glasses currently rentable for a glass type, across all its groupings
    ///
    /// A glass type with no stock rows has zero glasses.
    pub async fn get_available_glasses(&self, glass_type: &str) -> AppResult<AvailableGlasses> {
        let rows = self.store.list_stock_rows().await.during("list stock items")?;
        Ok(AvailableGlasses {
            glass_type: glass_type.to_string(),
            available_glasses: pool_glasses(&rows, glass_type).max(0),
        })
    }

    /// Every stock row with derived values computed from the current levels
    pub async fn get_stock_overview(&self) -> AppResult<Vec<StockItem>> {
        let rows = self.store.list_stock_rows().await.during("list stock items")?;
        Ok(stock_overview(&rows))
    }

    /// Glass types that can be offered on a new order
    pub async fn get_stock_for_orders(&self) -> AppResult<Vec<StockForOrder>> {
        let rows = self.store.list_stock_rows().await.during("list stock items")?;
        Ok(stock_for_orders(&rows))
    }

    pub async fn get_active_alerts(&self) -> AppResult<Vec<StockAlert>> {
        let rows = self.store.list_stock_rows().await.during("list stock items")?;
        Ok(active_alerts(&rows))
    }

    /// Audit history, newest first
    pub async fn get_stock_adjustments(
        &self,
        stock_item_id: Option<Uuid>,
    ) -> AppResult<Vec<StockAdjustment>> {
        self.store
            .list_adjustments(stock_item_id)
            .await
            .during("list stock adjustments")
    }

    /// Apply a signed change to one stock row
    ///
    /// Only damage, restock and manual adjustments may be made directly;
    /// order and return adjustments come from the order lifecycle.
    pub async fn adjust_stock(&self, input: AdjustStockInput) -> AppResult<AdjustmentOutcome> {
        input.validate()?;

        if !input.adjustment_type.is_manual() {
            return Err(AppError::validation(
                "adjustmentType",
                "Order and return adjustments are made by the order lifecycle",
            ));
        }
        if input.quantity_change == 0 {
            return Err(AppError::validation(
                "quantityChange",
                "Quantity change cannot be zero",
            ));
        }

        let input = &input;
        retry_on_conflict("adjust stock", self.max_retries, move || {
            self.try_adjust(input)
        })
        .await
    }

    async fn try_adjust(&self, input: &AdjustStockInput) -> AppResult<AdjustmentOutcome> {
        let row = self
            .store
            .find_stock_row(&input.glass_type, input.unit_type)
            .await
            .during("find stock item")?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Stock item {} ({})",
                    input.glass_type, input.unit_type
                ))
            })?;

        apply_stock_change(row.current_stock, input.quantity_change).map_err(|message| {
            AppError::InvalidAdjustment {
                glassware_type: row.catalog_type(),
                current_stock: row.current_stock,
                quantity_change: input.quantity_change,
                message: message.to_string(),
            }
        })?;

        let change = StockChange::against(&row, input.quantity_change, input.adjustment_type)
            .because(input.reason.clone());
        let (updated, adjustment) = self
            .store
            .apply_stock_change(&change)
            .await
            .during("apply stock change")?;

        tracing::info!(
            stock_item_id = %updated.id,
            adjustment_type = %input.adjustment_type,
            quantity_change = input.quantity_change,
            current_stock = updated.current_stock,
            "Stock adjusted"
        );

        Ok(AdjustmentOutcome {
            stock_item_id: updated.id,
            glass_type: updated.glass_type.clone(),
            unit_type: updated.unit_type,
            previous_stock: row.current_stock,
            current_stock: updated.current_stock,
            stock_status: updated.status(),
            adjustment,
        })
    }

    pub async fn restock_item(&self, input: StockMovementInput) -> AppResult<AdjustmentOutcome> {
        input.validate()?;
        self.adjust_stock(AdjustStockInput {
            glass_type: input.glass_type,
            unit_type: input.unit_type,
            quantity_change: input.quantity,
            adjustment_type: AdjustmentType::Restock,
            reason: input.reason,
        })
        .await
    }

    pub async fn report_damage(&self, input: StockMovementInput) -> AppResult<AdjustmentOutcome> {
        input.validate()?;
        self.adjust_stock(AdjustStockInput {
            glass_type: input.glass_type,
            unit_type: input.unit_type,
            quantity_change: -input.quantity,
            adjustment_type: AdjustmentType::Damage,
            reason: input.reason,
        })
        .await
    }
}
