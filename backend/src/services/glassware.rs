//! Glassware catalog service
//!
//! Catalog items are stock rows seen through their catalog name. Changing
//! an item's quantity is a stock change like any other and is audited.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use shared::models::{
    parse_catalog_type, AdjustmentType, Glassware, GlasswarePatch, NewGlassware, StockRow,
};
use shared::types::SearchQuery;

use super::retry_on_conflict;
use crate::config::StockConfig;
use crate::error::{AppError, AppResult, StoreResultExt};
use crate::store::{StockChange, StockRowPatch, Store, StoreError};

/// Glassware catalog service
#[derive(Clone)]
pub struct GlasswareService {
    store: Arc<dyn Store>,
    default_low_stock_threshold: i32,
    max_retries: u32,
}

impl GlasswareService {
    pub fn new(store: Arc<dyn Store>, config: &StockConfig) -> Self {
        Self {
            store,
            default_low_stock_threshold: config.default_low_stock_threshold,
            max_retries: config.max_adjustment_retries,
        }
    }

    /// Catalog items matching the search, newest first
    pub async fn list(&self, query: &SearchQuery) -> AppResult<Vec<Glassware>> {
        let rows = self.store.list_stock_rows().await.during("list glassware")?;
        let term = query.term();
        let mut items: Vec<Glassware> = rows
            .iter()
            .map(StockRow::to_glassware)
            .filter(|item| term.as_ref().map_or(true, |term| item.matches_search(term)))
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Glassware> {
        Ok(self.row(id).await?.to_glassware())
    }

    pub async fn create(&self, input: NewGlassware) -> AppResult<Glassware> {
        input.validate()?;

        let (glass_type, unit_type) = parse_catalog_type(input.glassware_type.trim());
        let now = Utc::now();
        let row = StockRow {
            id: Uuid::new_v4(),
            glass_type: glass_type.trim().to_string(),
            unit_type,
            description: input.description.trim().to_string(),
            price_per_unit: input.price_per_unit,
            current_stock: input.quantity_available,
            low_stock_threshold: input
                .low_stock_threshold
                .unwrap_or(self.default_low_stock_threshold),
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_stock_row(&row)
            .await
            .during("insert glassware")?;

        tracing::info!(
            glassware_id = %row.id,
            glassware_type = %row.catalog_type(),
            "Glassware created"
        );
        Ok(row.to_glassware())
    }

    /// Merge the provided fields
    ///
    /// A new quantity is applied as a manual adjustment against the level
    /// that was read, so concurrent orders are never overwritten.
    pub async fn update(&self, id: Uuid, patch: GlasswarePatch) -> AppResult<Glassware> {
        patch.validate()?;

        let patch = &patch;
        retry_on_conflict("update glassware", self.max_retries, move || {
            self.try_update(id, patch)
        })
        .await
    }

    async fn try_update(&self, id: Uuid, patch: &GlasswarePatch) -> AppResult<Glassware> {
        let row = self.row(id).await?;

        let mut changes = StockRowPatch {
            glass_type: None,
            description: patch.description.as_ref().map(|d| d.trim().to_string()),
            price_per_unit: patch.price_per_unit,
            low_stock_threshold: patch.low_stock_threshold,
        };

        if let Some(name) = &patch.glassware_type {
            let (glass_type, unit_type) = parse_catalog_type(name.trim());
            if unit_type != row.unit_type {
                return Err(AppError::validation(
                    "type",
                    "The unit grouping of a catalog item cannot change",
                ));
            }
            let glass_type = glass_type.trim().to_string();
            if glass_type != row.glass_type {
                changes.glass_type = Some(glass_type);
            }
        }

        let stock_change = patch
            .quantity_available
            .filter(|quantity| *quantity != row.current_stock)
            .map(|quantity| {
                StockChange::against(&row, quantity - row.current_stock, AdjustmentType::Manual)
                    .because(Some("Catalog quantity updated".to_string()))
            });

        let updated = self
            .store
            .update_stock_row(id, &changes, stock_change.as_ref())
            .await
            .during("update glassware")?;

        tracing::info!(
            glassware_id = %id,
            quantity_change = stock_change.as_ref().map_or(0, |c| c.quantity_change),
            "Glassware updated"
        );
        Ok(updated.to_glassware())
    }

    /// Delete a catalog item and the orders placed for it
    ///
    /// The item's audit history is kept. Returns the number of orders removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<usize> {
        let removed = self
            .store
            .delete_stock_row(id)
            .await
            .during("delete glassware")?;

        tracing::info!(
            glassware_id = %id,
            removed_orders = removed.len(),
            "Glassware deleted"
        );
        Ok(removed.len())
    }

    async fn row(&self, id: Uuid) -> AppResult<StockRow> {
        match self.store.get_stock_row(id).await {
            Err(StoreError::NotFound(_)) => Err(AppError::NotFound("Glassware".to_string())),
            result => result.during("get glassware"),
        }
    }
}
