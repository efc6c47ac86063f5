//! Product filter specification
//!
//! Three predicates combined with logical AND: case-insensitive name
//! substring, category membership and stock positivity. An empty name and
//! an empty category set place no constraint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entities::Product;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Name substring, matched case-insensitively after trimming
    #[serde(default)]
    pub name: String,

    /// Accepted categories; empty accepts all
    #[serde(default)]
    pub categories: BTreeSet<String>,

    /// Only products with at least one unit in stock
    #[serde(default)]
    pub in_stock_only: bool,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn in_stock(mut self, in_stock_only: bool) -> Self {
        self.in_stock_only = in_stock_only;
        self
    }

    /// Flip a category in or out of the accepted set
    pub fn toggle_category(&mut self, category: &str) {
        if !self.categories.remove(category) {
            self.categories.insert(category.to_string());
        }
    }

    /// The name term as sent to the service, `None` when blank
    pub fn name_term(&self) -> Option<&str> {
        let trimmed = self.name.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// True when no predicate constrains the result
    pub fn is_empty(&self) -> bool {
        self.name_term().is_none() && self.categories.is_empty() && !self.in_stock_only
    }

    /// Check whether a product passes every predicate
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = self.name_term() {
            if !product.name.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }
        !self.in_stock_only || product.in_stock()
    }
}
