//! Stock accounting tests
//!
//! Tests for stock tracking including:
//! - Adjustments never drive a row below zero
//! - Exactly one audit record per applied adjustment
//! - Derived status and pool values follow the stored levels

mod common;

use common::*;
use proptest::prelude::*;

use glass_rental_backend::error::AppError;
use glass_rental_backend::services::stock::{AdjustStockInput, StockMovementInput};
use shared::models::{AdjustmentType, StockStatus, UnitType};

fn adjustment(
    glass_type: &str,
    unit_type: UnitType,
    quantity_change: i32,
    adjustment_type: AdjustmentType,
) -> AdjustStockInput {
    AdjustStockInput {
        glass_type: glass_type.to_string(),
        unit_type,
        quantity_change,
        adjustment_type,
        reason: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[tokio::test]
async fn test_damage_scenario_records_one_adjustment() {
    let app = test_app();
    let beer = seed_glassware(&app, "Beer Glass", 240, 400).await;

    let outcome = app
        .stock
        .adjust_stock(AdjustStockInput {
            reason: Some("Dropped crate".to_string()),
            ..adjustment("Beer Glass", UnitType::Individual, -5, AdjustmentType::Damage)
        })
        .await
        .unwrap();

    assert_eq!(outcome.previous_stock, 240);
    assert_eq!(outcome.current_stock, 235);
    assert_eq!(current_stock(&app, beer.id).await, 235);

    let history = app.stock.get_stock_adjustments(Some(beer.id)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quantity_change, -5);
    assert_eq!(history[0].adjustment_type, AdjustmentType::Damage);
    assert_eq!(history[0].reason.as_deref(), Some("Dropped crate"));
}

#[tokio::test]
async fn test_adjustment_below_zero_is_rejected() {
    let app = test_app();
    let beer = seed_glassware(&app, "Beer Glass", 4, 400).await;

    let err = app
        .stock
        .adjust_stock(adjustment("Beer Glass", UnitType::Individual, -5, AdjustmentType::Manual))
        .await
        .unwrap_err();

    match err {
        AppError::InvalidAdjustment {
            current_stock,
            quantity_change,
            ..
        } => {
            assert_eq!(current_stock, 4);
            assert_eq!(quantity_change, -5);
        }
        other => panic!("expected invalid adjustment, got {:?}", other),
    }
    assert_eq!(current_stock(&app, beer.id).await, 4);
    assert!(app.stock.get_stock_adjustments(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_order_and_return_types_are_reserved() {
    let app = test_app();
    seed_glassware(&app, "Beer Glass", 10, 400).await;

    for reserved in [AdjustmentType::Order, AdjustmentType::Return] {
        let err = app
            .stock
            .adjust_stock(adjustment("Beer Glass", UnitType::Individual, 1, reserved))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}

#[tokio::test]
async fn test_zero_change_is_rejected() {
    let app = test_app();
    seed_glassware(&app, "Beer Glass", 10, 400).await;

    let err = app
        .stock
        .adjust_stock(adjustment("Beer Glass", UnitType::Individual, 0, AdjustmentType::Manual))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_unknown_stock_row_is_not_found() {
    let app = test_app();
    seed_glassware(&app, "Beer Glass", 10, 400).await;

    let err = app
        .stock
        .adjust_stock(adjustment("Beer Glass", UnitType::LargeBox, 1, AdjustmentType::Restock))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_restock_and_damage_wrappers() {
    let app = test_app();
    let boxes = seed_glassware(&app, "Wine Glass Small Box", 3, 2_700).await;

    let restocked = app
        .stock
        .restock_item(StockMovementInput {
            glass_type: "Wine Glass".to_string(),
            unit_type: UnitType::SmallBox,
            quantity: 4,
            reason: None,
        })
        .await
        .unwrap();
    assert_eq!(restocked.current_stock, 7);
    assert_eq!(restocked.adjustment.adjustment_type, AdjustmentType::Restock);

    let damaged = app
        .stock
        .report_damage(StockMovementInput {
            glass_type: "Wine Glass".to_string(),
            unit_type: UnitType::SmallBox,
            quantity: 2,
            reason: Some("Chipped".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(damaged.current_stock, 5);
    assert_eq!(damaged.adjustment.quantity_change, -2);

    let err = app
        .stock
        .restock_item(StockMovementInput {
            glass_type: "Wine Glass".to_string(),
            unit_type: UnitType::SmallBox,
            quantity: 0,
            reason: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let history = app.stock.get_stock_adjustments(Some(boxes.id)).await.unwrap();
    assert_eq!(history.len(), 2);
    // newest first
    assert_eq!(history[0].adjustment_type, AdjustmentType::Damage);
}

#[tokio::test]
async fn test_pool_spans_unit_groupings() {
    let app = test_app();
    seed_glassware(&app, "Wine Glass", 50, 450).await;
    seed_glassware(&app, "Wine Glass Small Box", 3, 2_700).await;
    seed_glassware(&app, "Beer Glass Large Box", 2, 19_200).await;

    let wine = app.stock.get_available_glasses("Wine Glass").await.unwrap();
    assert_eq!(wine.available_glasses, 68);

    let beer = app.stock.get_available_glasses("Beer Glass").await.unwrap();
    assert_eq!(beer.available_glasses, 96);

    let mugs = app.stock.get_available_glasses("Mug").await.unwrap();
    assert_eq!(mugs.glass_type, "Mug");
    assert_eq!(mugs.available_glasses, 0);

    let overview = app.stock.get_stock_overview().await.unwrap();
    assert_eq!(overview.len(), 3);
    for item in overview.iter().filter(|item| item.glass_type == "Wine Glass") {
        assert_eq!(item.total_available_glasses, 68);
    }
    let small_box = overview
        .iter()
        .find(|item| item.unit_type == UnitType::SmallBox)
        .unwrap();
    assert_eq!(small_box.glasses_per_unit, 6);
    assert_eq!(small_box.total_glasses_for_unit_type, 18);
}

#[tokio::test]
async fn test_status_and_alerts_follow_stock_level() {
    let app = test_app();
    seed_glassware(&app, "Champagne Flute", 12, 600).await;

    let overview = app.stock.get_stock_overview().await.unwrap();
    assert_eq!(overview[0].stock_status, StockStatus::InStock);
    assert!(app.stock.get_active_alerts().await.unwrap().is_empty());

    let outcome = app
        .stock
        .adjust_stock(adjustment("Champagne Flute", UnitType::Individual, -5, AdjustmentType::Damage))
        .await
        .unwrap();
    assert_eq!(outcome.stock_status, StockStatus::LowStock);

    app.stock
        .adjust_stock(adjustment("Champagne Flute", UnitType::Individual, -7, AdjustmentType::Damage))
        .await
        .unwrap();

    let alerts = app.stock.get_active_alerts().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, StockStatus::OutOfStock);

    // nothing left to rent
    assert!(app.stock.get_stock_for_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stock_for_orders_lists_individual_rows() {
    let app = test_app();
    let wine = seed_glassware(&app, "Wine Glass", 50, 450).await;
    seed_glassware(&app, "Wine Glass Small Box", 3, 2_700).await;

    let offers = app.stock.get_stock_for_orders().await.unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].stock_item_id, wine.id);
    assert_eq!(offers[0].available_glasses, 68);
    assert_eq!(offers[0].price_per_unit, 450);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: a row never goes negative and ends at the initial level plus
    /// every accepted change, with one audit record per accepted change
    #[test]
    fn prop_adjustments_never_go_negative(
        initial in 0i32..200,
        changes in prop::collection::vec(-80i32..80, 1..20),
    ) {
        let (final_stock, expected, accepted, records) = tokio_test::block_on(async {
            let app = test_app();
            let row = seed_glassware(&app, "Beer Glass", initial, 400).await;

            let mut expected = initial;
            let mut accepted = 0usize;
            for change in changes.iter().copied().filter(|c| *c != 0) {
                let result = app
                    .stock
                    .adjust_stock(adjustment("Beer Glass", UnitType::Individual, change, AdjustmentType::Manual))
                    .await;
                if expected + change >= 0 {
                    prop_assert!(result.is_ok());
                    expected += change;
                    accepted += 1;
                } else {
                    let is_invalid = matches!(result, Err(AppError::InvalidAdjustment { .. }));
                    prop_assert!(is_invalid);
                }
                prop_assert!(current_stock(&app, row.id).await >= 0);
            }

            let records = app.stock.get_stock_adjustments(Some(row.id)).await.unwrap().len();
            Ok((current_stock(&app, row.id).await, expected, accepted, records))
        })?;

        prop_assert_eq!(final_stock, expected);
        prop_assert_eq!(records, accepted);
    }
}
