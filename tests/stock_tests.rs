// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stock workflows: purchases with undo, routine creation with its
//! best-effort linked tracker, and the days-remaining projection.

use chrono::FixedOffset;
use lifetrack_core::models::{RecurrenceRule, StockProduct};
use lifetrack_core::services::NewRoutine;
use lifetrack_core::AppState;

mod common;
use common::{date, test_now, test_state, USER};

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

async fn make_product(state: &AppState, quantity: f64) -> StockProduct {
    state
        .store
        .products
        .create(USER, |meta| {
            Ok(StockProduct {
                meta,
                name: "Creatine".to_string(),
                unit: Some("g".to_string()),
                quantity_on_hand: quantity,
            })
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_purchase_undo_round_trip() {
    let (state, _clock) = test_state();
    let product = make_product(&state, 10.0).await;

    let purchase = state
        .stock
        .record_purchase(USER, &product.meta.id, 5.0, test_now())
        .await
        .unwrap();

    let stocked = state
        .store
        .products
        .get_by_id(&product.meta.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stocked.quantity_on_hand, 15.0);

    // Undo reverts both rows: purchase soft-deleted, quantity back.
    let undone = state.undo.undo_last().await.unwrap();
    assert_eq!(undone.as_deref(), Some("Purchase recorded"));
    assert!(state
        .store
        .purchases
        .get_by_id(&purchase.meta.id)
        .await
        .unwrap()
        .is_none());
    let reverted = state
        .store
        .products
        .get_by_id(&product.meta.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reverted.quantity_on_hand, 10.0);

    // Nothing left to undo; a second invoke is a quiet no-op.
    assert!(state.undo.undo_last().await.unwrap().is_none());
}

#[tokio::test]
async fn test_purchase_undo_tolerates_deleted_product() {
    let (state, _clock) = test_state();
    let product = make_product(&state, 10.0).await;
    state
        .stock
        .record_purchase(USER, &product.meta.id, 5.0, test_now())
        .await
        .unwrap();

    // The product disappears before the undo runs; compensation must
    // still succeed (cross-entity cascades may clean up independently).
    state.store.products.soft_delete(&product.meta.id).await.unwrap();
    state.undo.undo_last().await.unwrap();
}

#[tokio::test]
async fn test_rejects_non_positive_purchase() {
    let (state, _clock) = test_state();
    let product = make_product(&state, 10.0).await;
    assert!(state
        .stock
        .record_purchase(USER, &product.meta.id, 0.0, test_now())
        .await
        .is_err());
}

#[tokio::test]
async fn test_routine_creates_linked_tracker() {
    let (state, _clock) = test_state();
    let product = make_product(&state, 100.0).await;

    let routine = state
        .stock
        .create_routine(
            USER,
            NewRoutine {
                product_id: product.meta.id.clone(),
                recurrence: RecurrenceRule::Daily,
                quantity_per_occurrence: 5.0,
                name: "Take creatine".to_string(),
            },
        )
        .await
        .unwrap();

    let tracker_id = routine
        .linked_tracker_id
        .expect("routine should link its auto-created tracker");
    let tracker = state
        .store
        .trackers
        .get_by_id(&tracker_id)
        .await
        .unwrap()
        .expect("linked tracker should exist");
    assert_eq!(tracker.name, "Take creatine");
    assert_eq!(tracker.recurrence, RecurrenceRule::Daily);
}

#[tokio::test]
async fn test_routine_survives_linked_tracker_failure() {
    let (state, _clock) = test_state();
    let product = make_product(&state, 100.0).await;

    // An invalid recurrence fails the routine itself, fast.
    let err = state
        .stock
        .create_routine(
            USER,
            NewRoutine {
                product_id: product.meta.id.clone(),
                recurrence: RecurrenceRule::Weekly {
                    days_of_week: vec![],
                },
                quantity_per_occurrence: 5.0,
                name: "Broken".to_string(),
            },
        )
        .await;
    assert!(err.is_err());
    assert!(state.store.routines.get_all_by_date_desc().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_days_remaining_projection_daily_consumption() {
    let (state, _clock) = test_state();
    let product = make_product(&state, 3.0).await;
    state
        .stock
        .create_routine(
            USER,
            NewRoutine {
                product_id: product.meta.id.clone(),
                recurrence: RecurrenceRule::Daily,
                quantity_per_occurrence: 1.0,
                name: "Take creatine".to_string(),
            },
        )
        .await
        .unwrap();

    // 3 units at 1/day starting tomorrow: covered through 02-26,
    // demand exceeds stock on 02-27.
    let projection = state
        .stock
        .days_remaining(&product.meta.id, date("2026-02-23"), utc())
        .await
        .unwrap()
        .expect("daily consumption must run out");
    assert_eq!(projection.days_remaining, 3);
    assert_eq!(projection.runs_out_on, date("2026-02-27"));
}

#[tokio::test]
async fn test_days_remaining_none_without_routines() {
    let (state, _clock) = test_state();
    let product = make_product(&state, 3.0).await;
    let projection = state
        .stock
        .days_remaining(&product.meta.id, date("2026-02-23"), utc())
        .await
        .unwrap();
    assert!(projection.is_none());
}
