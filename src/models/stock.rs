// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stock/inventory entities: products, consumption routines and
//! purchases. Routines reuse the tracker recurrence shape to drive a
//! days-remaining projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::record::{Patch, Record, RecordMeta};
use crate::models::tracker::RecurrenceRule;

/// A consumable product with an on-hand quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockProduct {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    /// Display unit ("capsules", "g", ...)
    pub unit: Option<String>,
    /// Current on-hand quantity
    pub quantity_on_hand: f64,
}

impl Record for StockProduct {
    const TABLE: &'static str = collections::STOCK_PRODUCTS;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

/// Partial update for a product.
#[derive(Debug, Default, Clone)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub unit: Option<Option<String>>,
    pub quantity_on_hand: Option<f64>,
}

impl Patch<StockProduct> for ProductPatch {
    fn validate(&self, _current: &StockProduct) -> Result<()> {
        if let Some(q) = self.quantity_on_hand {
            if q < 0.0 {
                return Err(AppError::Validation(
                    "on-hand quantity cannot be negative".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn apply(self, target: &mut StockProduct) {
        if let Some(v) = self.name {
            target.name = v;
        }
        if let Some(v) = self.unit {
            target.unit = v;
        }
        if let Some(v) = self.quantity_on_hand {
            target.quantity_on_hand = v;
        }
    }
}

/// A recurring consumption rule for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRoutine {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub product_id: String,
    #[serde(flatten)]
    pub recurrence: RecurrenceRule,
    /// Quantity consumed per due day
    pub quantity_per_occurrence: f64,
    #[serde(default)]
    pub is_active: bool,
    /// Tracker auto-created alongside this routine (best-effort)
    pub linked_tracker_id: Option<String>,
}

impl StockRoutine {
    pub fn validate(&self) -> Result<()> {
        if self.quantity_per_occurrence <= 0.0 {
            return Err(AppError::Validation(
                "quantity per occurrence must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Record for StockRoutine {
    const TABLE: &'static str = collections::STOCK_ROUTINES;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

/// Partial update for a routine.
#[derive(Debug, Default, Clone)]
pub struct RoutinePatch {
    pub quantity_per_occurrence: Option<f64>,
    pub is_active: Option<bool>,
    pub linked_tracker_id: Option<Option<String>>,
}

impl Patch<StockRoutine> for RoutinePatch {
    fn validate(&self, _current: &StockRoutine) -> Result<()> {
        if let Some(q) = self.quantity_per_occurrence {
            if q <= 0.0 {
                return Err(AppError::Validation(
                    "quantity per occurrence must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn apply(self, target: &mut StockRoutine) {
        if let Some(v) = self.quantity_per_occurrence {
            target.quantity_per_occurrence = v;
        }
        if let Some(v) = self.is_active {
            target.is_active = v;
        }
        if let Some(v) = self.linked_tracker_id {
            target.linked_tracker_id = v;
        }
    }
}

/// A restock purchase for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPurchase {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub product_id: String,
    /// Quantity added to stock, positive
    pub quantity: f64,
    pub purchased_at: DateTime<Utc>,
}

impl Record for StockPurchase {
    const TABLE: &'static str = collections::STOCK_PURCHASES;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn sort_instant(&self) -> DateTime<Utc> {
        self.purchased_at
    }
}
