use crate::error::FieldErrors;
use crate::pantry::repo::Ingredient;
use crate::pantry::units::Dimension;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngredientRequest {
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

impl CreateIngredientRequest {
    pub fn validate(&self) -> FieldErrors {
        let mut errs = FieldErrors::new();
        if self.name.trim().is_empty() {
            errs.push("name", "must not be empty");
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            errs.push("quantity", "must be a non-negative number");
        }
        errs
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIngredientRequest {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

impl UpdateIngredientRequest {
    pub fn validate(&self) -> FieldErrors {
        let mut errs = FieldErrors::new();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                errs.push("name", "must not be empty");
            }
        }
        if let Some(q) = self.quantity {
            if !q.is_finite() || q < 0.0 {
                errs.push("quantity", "must be a non-negative number");
            }
        }
        errs
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    pub items: Vec<CreateIngredientRequest>,
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub limit: Option<usize>,
}

/// One flagged pantry item with its normalized magnitude for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockEntry {
    pub id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub dimension: Dimension,
    pub base: f64,
    pub display: String,
}

/// Flagged items plus how many were cut off by the display limit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockResponse {
    pub items: Vec<LowStockEntry>,
    pub remaining: usize,
}

impl LowStockEntry {
    pub fn from_flagged(item: &Ingredient, normalized: crate::pantry::units::Normalized) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            dimension: normalized.dimension,
            base: normalized.base,
            display: normalized.display,
        }
    }
}
