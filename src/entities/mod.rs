//! Entity type definitions

pub mod metrics;
pub mod product;

pub use metrics::{InventoryMetrics, StockSummary};
pub use product::{Product, ProductForm, ProductId, ProductPage};
