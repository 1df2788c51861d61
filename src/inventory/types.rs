//! Types for inventory items and drafts

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An inventory item as held by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Server-assigned identifier
    pub id: i64,

    /// Item name, non-empty
    pub name: String,

    /// Units on hand
    pub quantity: i64,

    /// Unit price; rendered with two decimals
    pub price: f64,

    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InventoryItem {
    /// Derived value of this line: `price × quantity`
    pub fn line_value(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Client-supplied fields for creating or fully replacing an item.
/// The `id` is always server-assigned and never part of a draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemDraft {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ItemDraft {
    /// Validate the draft locally, before any network call
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        if self.quantity < 0 {
            return Err(Error::validation("quantity", "must not be negative"));
        }
        if self.price < 0.0 {
            return Err(Error::validation("price", "must not be negative"));
        }
        Ok(())
    }
}

/// Aggregates over the full collection, recomputed from scratch after
/// every change
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InventoryStats {
    /// Number of distinct items
    pub count: usize,

    /// Sum of all quantities
    pub total_quantity: i64,

    /// Sum of all line values, unrounded until display
    pub total_value: f64,
}
