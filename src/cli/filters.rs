//! Filter and sort arguments shared by `product list` and `browse`

use crate::core::{FilterSpec, SortDirection, SortKey, SortSpec};

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive name substring
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Only these categories (repeatable or comma separated)
    #[arg(long, short = 'c', value_delimiter = ',')]
    pub category: Vec<String>,

    /// Only products with stock on hand
    #[arg(long)]
    pub in_stock: bool,

    /// Sort keys in priority order, e.g. `category,name:desc` or `unitPrice,desc`
    #[arg(long, short = 's', value_parser = parse_sort_keys)]
    pub sort: Vec<SortSpec>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> FilterSpec {
        let mut filter = FilterSpec::new().in_stock(self.in_stock);
        if let Some(name) = &self.name {
            filter = filter.with_name(name.clone());
        }
        for category in &self.category {
            let category = category.trim();
            if !category.is_empty() {
                filter = filter.with_category(category);
            }
        }
        filter
    }

    /// Repeated columns keep their first position
    pub fn to_sort(&self) -> SortSpec {
        SortSpec::from_keys(self.sort.iter().flat_map(|spec| spec.keys().iter().copied()))
    }
}

/// Comma separated sort keys, each `column` or `column:dir`.
///
/// A bare direction applies to the key before it, so the wire form
/// `unitPrice,desc` reads as one key.
pub fn parse_sort_keys(s: &str) -> Result<SortSpec, String> {
    let mut keys: Vec<SortKey> = Vec::new();
    for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let (Ok(direction), Some(last)) = (token.parse::<SortDirection>(), keys.last_mut()) {
            last.direction = direction;
            continue;
        }
        keys.push(token.parse()?);
    }
    if keys.is_empty() {
        return Err("expected at least one sort column".to_string());
    }
    Ok(SortSpec::from_keys(keys))
}
