//! Inventory metrics - server-computed aggregates over the whole inventory

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stock and value totals for a group of products
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    /// Sum of unit price times quantity
    #[serde(default)]
    pub total_value: f64,

    /// Sum of quantities
    #[serde(default)]
    pub total_stock: u64,

    /// Mean unit price
    #[serde(default)]
    pub average_price: f64,
}

/// Response of `GET /products/metrics`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetrics {
    #[serde(default)]
    pub overall: StockSummary,

    #[serde(default)]
    pub by_category: BTreeMap<String, StockSummary>,
}

impl InventoryMetrics {
    pub fn category(&self, name: &str) -> Option<&StockSummary> {
        self.by_category.get(name)
    }
}
