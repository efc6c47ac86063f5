//! CLI command implementations

pub mod browse;
pub mod categories;
pub mod completions;
pub mod config;
pub mod metrics;
pub mod product;

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::{Config, HttpInventoryClient};

/// Effective configuration: file, then environment, then `--base-url`
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let config = Config::load()?.with_base_url(global.base_url.clone());
    config.validate()?;
    tracing::debug!(base_url = %config.base_url, page_size = config.page_size, "configuration loaded");
    Ok(config)
}

/// Configuration plus a client for the configured service
pub fn connect(global: &GlobalOpts) -> Result<(Config, HttpInventoryClient)> {
    let config = load_config(global)?;
    let client = HttpInventoryClient::new(&config)?;
    Ok((config, client))
}
