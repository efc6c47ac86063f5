//! Core module - inventory client, browse state and configuration

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod local;
pub mod logging;
pub mod query;
pub mod sort;
pub mod state;
pub mod store;
pub mod view;

pub use client::{fetch_all, find_product, HttpInventoryClient, InventoryApi};
pub use config::{Config, ConfigError};
pub use error::{InventoryError, InventoryResult};
pub use filter::FilterSpec;
pub use local::LocalInventory;
pub use query::ListQuery;
pub use sort::{SortColumn, SortDirection, SortKey, SortSpec};
pub use state::BrowseState;
pub use store::{FetchOutcome, FetchTicket, PageView, ProductStore, StoreView};
pub use view::{compute_metrics, derive_view, paginate, sort_products};
