//! Stock management page: inventory rows, levels and alerts.

use serde::{Deserialize, Serialize};

use crate::models::{StockItem, StockUpdateRequest};

/// At or below this quantity an item is flagged low.
pub const LOW_LEVEL: f64 = 20.0;
/// At or below this quantity an item is flagged medium and listed as an alert.
pub const MEDIUM_LEVEL: f64 = 50.0;
/// Quantity that fills the level bar.
pub const FULL_BAR_QUANTITY: f64 = 200.0;
/// Unit shown when the backend gives none.
pub const DEFAULT_UNIT: &str = "kg";

/// Serializes as the badge status used by the stock table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
    #[serde(rename = "low-stock")]
    Low,
    #[serde(rename = "medium-stock")]
    Medium,
    #[serde(rename = "in-stock")]
    InStock,
}

impl StockLevel {
    pub fn classify(quantity: f64) -> Self {
        if quantity <= LOW_LEVEL {
            StockLevel::Low
        } else if quantity <= MEDIUM_LEVEL {
            StockLevel::Medium
        } else {
            StockLevel::InStock
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    pub ingredient_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub level: StockLevel,
    /// Width of the level bar, 0..=100.
    pub fill_percent: u32,
}

impl From<&StockItem> for StockRow {
    fn from(item: &StockItem) -> Self {
        let unit = match item.display_unit() {
            "" => DEFAULT_UNIT,
            unit => unit,
        };
        Self {
            ingredient_id: item.ingredient_id.clone(),
            name: item.display_name().to_string(),
            quantity: item.available_quantity,
            unit: unit.to_string(),
            level: StockLevel::classify(item.available_quantity),
            fill_percent: (item.available_quantity / FULL_BAR_QUANTITY * 100.0).clamp(0.0, 100.0)
                as u32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTable {
    pub rows: Vec<StockRow>,
    /// Rows at or below [`MEDIUM_LEVEL`], in inventory order.
    pub low_stock_alerts: Vec<StockRow>,
}

pub fn build_stock_table(items: &[StockItem]) -> StockTable {
    let rows: Vec<StockRow> = items.iter().map(StockRow::from).collect();
    let low_stock_alerts = rows
        .iter()
        .filter(|r| r.quantity <= MEDIUM_LEVEL)
        .cloned()
        .collect();
    StockTable {
        rows,
        low_stock_alerts,
    }
}

/// Build an update for the item whose name matches `name` (case-insensitive).
///
/// `None` when no item matches or the name is blank.
pub fn update_for_name(items: &[StockItem], name: &str, quantity: f64) -> Option<StockUpdateRequest> {
    let wanted = name.trim();
    if wanted.is_empty() {
        return None;
    }
    items
        .iter()
        .find(|item| item.display_name().eq_ignore_ascii_case(wanted))
        .map(|item| StockUpdateRequest {
            ingredient_id: item.ingredient_id.clone(),
            available_quantity: quantity,
        })
}
