// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stock workflows: purchases with undo, consumption routines and the
//! days-remaining projection.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::stock::{ProductPatch, StockProduct, StockPurchase, StockRoutine};
use crate::models::tracker::{RecurrenceRule, ResponseType};
use crate::recurrence::{is_due_on, validate_rule};
use crate::services::trackers::{NewTracker, TrackerService};
use crate::services::undo::UndoLog;
use crate::time_utils::to_local_date;

/// Projection horizon. Beyond this we report the stock as not
/// running out.
const PROJECTION_DAYS: u32 = 365;

/// Days-remaining projection for a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockProjection {
    pub days_remaining: u32,
    /// First local date on which demand exceeds remaining stock
    pub runs_out_on: NaiveDate,
}

/// Fields for a new consumption routine.
#[derive(Debug, Clone)]
pub struct NewRoutine {
    pub product_id: String,
    pub recurrence: RecurrenceRule,
    pub quantity_per_occurrence: f64,
    /// Display name for the best-effort linked tracker
    pub name: String,
}

/// Stock workflows over product/routine/purchase repositories.
#[derive(Clone)]
pub struct StockService {
    products: Repository<StockProduct>,
    routines: Repository<StockRoutine>,
    purchases: Repository<StockPurchase>,
    trackers: TrackerService,
    undo: Arc<UndoLog>,
}

impl StockService {
    pub fn new(
        products: Repository<StockProduct>,
        routines: Repository<StockRoutine>,
        purchases: Repository<StockPurchase>,
        trackers: TrackerService,
        undo: Arc<UndoLog>,
    ) -> Self {
        Self {
            products,
            routines,
            purchases,
            trackers,
            undo,
        }
    }

    /// Record a purchase: create the purchase row and add its quantity
    /// to the product's on-hand stock, registering an undo entry that
    /// reverts both.
    ///
    /// Cross-entity consistency lives here, in the caller: the
    /// compensation soft-deletes the purchase and writes back the
    /// captured pre-purchase quantity, tolerating rows that were
    /// cleaned up in the meantime.
    pub async fn record_purchase(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: f64,
        purchased_at: DateTime<Utc>,
    ) -> Result<StockPurchase> {
        if quantity <= 0.0 {
            return Err(AppError::Validation(
                "purchase quantity must be positive".to_string(),
            ));
        }
        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {}", product_id)))?;

        let purchase = self
            .purchases
            .create(user_id, |meta| {
                Ok(StockPurchase {
                    meta,
                    product_id: product_id.to_string(),
                    quantity,
                    purchased_at,
                })
            })
            .await?;

        let previous_quantity = product.quantity_on_hand;
        self.products
            .update(
                product_id,
                ProductPatch {
                    quantity_on_hand: Some(previous_quantity + quantity),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(
            product_id,
            quantity,
            purchase_id = %purchase.meta.id,
            "Purchase recorded"
        );

        let purchases = self.purchases.clone();
        let products = self.products.clone();
        let purchase_id = purchase.meta.id.clone();
        let product_id = product_id.to_string();
        self.undo
            .with_undo(
                "Purchase recorded",
                // Side effects already applied above.
                async { Ok(()) },
                move || {
                    Box::pin(async move {
                        purchases.soft_delete(&purchase_id).await?;
                        // The product may itself have been deleted since;
                        // reverting stock on a missing row is a no-op.
                        if products.get_by_id(&product_id).await?.is_some() {
                            products
                                .update(
                                    &product_id,
                                    ProductPatch {
                                        quantity_on_hand: Some(previous_quantity),
                                        ..Default::default()
                                    },
                                )
                                .await?;
                        }
                        Ok(())
                    })
                },
            )
            .await?;

        Ok(purchase)
    }

    /// Create a consumption routine, auto-creating a linked boolean
    /// tracker with the same schedule.
    ///
    /// The linked tracker is best-effort: its failure is logged and
    /// swallowed so the routine creation itself is never held hostage
    /// to the derived effect.
    pub async fn create_routine(&self, user_id: &str, new: NewRoutine) -> Result<StockRoutine> {
        validate_rule(&new.recurrence)?;
        self.products
            .get_by_id(&new.product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {}", new.product_id)))?;

        let routine = self
            .routines
            .create(user_id, |meta| {
                let routine = StockRoutine {
                    meta,
                    product_id: new.product_id.clone(),
                    recurrence: new.recurrence.clone(),
                    quantity_per_occurrence: new.quantity_per_occurrence,
                    is_active: true,
                    linked_tracker_id: None,
                };
                routine.validate()?;
                Ok(routine)
            })
            .await?;

        // Best-effort linked tracker. Narrow catch: only this derived
        // effect is allowed to fail silently.
        let linked = self
            .trackers
            .create_tracker(
                user_id,
                NewTracker {
                    name: new.name,
                    response_type: ResponseType::Boolean,
                    recurrence: new.recurrence,
                    unit: None,
                    choices: Vec::new(),
                    slider_min: None,
                    slider_max: None,
                    slider_step: None,
                },
            )
            .await;

        match linked {
            Ok(tracker) => {
                self.routines
                    .update(
                        &routine.meta.id,
                        crate::models::stock::RoutinePatch {
                            linked_tracker_id: Some(Some(tracker.meta.id)),
                            ..Default::default()
                        },
                    )
                    .await
            }
            Err(err) => {
                tracing::warn!(
                    routine_id = %routine.meta.id,
                    error = %err,
                    "Linked tracker creation failed; keeping routine without it"
                );
                Ok(routine)
            }
        }
    }

    /// Project when a product's stock runs out, simulating day-by-day
    /// consumption from its active routines starting the day after
    /// `today`.
    ///
    /// Returns `None` when stock lasts beyond the projection horizon
    /// (including when there is no consuming routine at all).
    pub async fn days_remaining(
        &self,
        product_id: &str,
        today: NaiveDate,
        offset: chrono::FixedOffset,
    ) -> Result<Option<StockProjection>> {
        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {}", product_id)))?;

        let routines = self
            .routines
            .filter(|r| r.product_id == product_id && r.is_active)
            .await?;
        if routines.is_empty() {
            return Ok(None);
        }

        let anchored: Vec<(RecurrenceRule, NaiveDate, f64)> = routines
            .iter()
            .map(|r| {
                (
                    r.recurrence.clone(),
                    to_local_date(r.meta.created_at, offset),
                    r.quantity_per_occurrence,
                )
            })
            .collect();

        let mut remaining = product.quantity_on_hand;
        let mut day = today;
        for elapsed in 1..=PROJECTION_DAYS {
            day = match day.succ_opt() {
                Some(next) => next,
                None => return Ok(None),
            };
            for (rule, anchor, quantity) in &anchored {
                if is_due_on(rule, day, *anchor)? {
                    remaining -= quantity;
                }
            }
            if remaining < 0.0 {
                return Ok(Some(StockProjection {
                    days_remaining: elapsed - 1,
                    runs_out_on: day,
                }));
            }
        }
        Ok(None)
    }
}
