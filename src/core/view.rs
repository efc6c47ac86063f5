//! Client-side derivation of the visible product list
//!
//! Pure functions over a product collection: filter, stable multi-key sort,
//! page slicing and aggregate metrics. They reproduce what the inventory
//! service does for `GET /products` and `GET /products/metrics`, so a
//! locally derived page and a server-provided one are interchangeable.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::core::filter::FilterSpec;
use crate::core::sort::{SortColumn, SortDirection, SortKey, SortSpec};
use crate::entities::{InventoryMetrics, Product, ProductPage, StockSummary};

/// Filter then sort a product collection
pub fn derive_view(products: &[Product], filter: &FilterSpec, sort: &SortSpec) -> Vec<Product> {
    let mut visible: Vec<Product> = products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect();
    sort_products(&mut visible, sort);
    visible
}

/// Stable in-place sort by every key of the spec, in precedence order
pub fn sort_products(products: &mut [Product], sort: &SortSpec) {
    if sort.is_empty() {
        return;
    }
    products.sort_by(|a, b| compare_products(a, b, sort));
}

/// Compare two products under a sort spec
pub fn compare_products(a: &Product, b: &Product, sort: &SortSpec) -> Ordering {
    sort.keys()
        .iter()
        .map(|key| compare_by_key(a, b, key))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn compare_by_key(a: &Product, b: &Product, key: &SortKey) -> Ordering {
    let dir = key.direction;
    match key.column {
        SortColumn::Name => directed(compare_text(&a.name, &b.name), dir),
        SortColumn::Category => directed(compare_text(&a.category, &b.category), dir),
        SortColumn::UnitPrice => directed(a.unit_price.total_cmp(&b.unit_price), dir),
        SortColumn::QuantityInStock => {
            directed(a.quantity_in_stock.cmp(&b.quantity_in_stock), dir)
        }
        SortColumn::ExpirationDate => nulls_last(a.expiration_date, b.expiration_date, dir),
        SortColumn::CreationDate => nulls_last(a.creation_date(), b.creation_date(), dir),
        SortColumn::UpdateDate => nulls_last(a.update_date(), b.update_date(), dir),
    }
}

fn directed(ord: Ordering, dir: SortDirection) -> Ordering {
    match dir {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// Absent values go last in both directions
fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>, dir: SortDirection) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => directed(x.cmp(&y), dir),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Dictionary-style text order: letters compare case-insensitively first,
/// exact code points only break ties.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Slice a derived list into the service's page shape
pub fn paginate(products: Vec<Product>, page: usize, size: usize) -> ProductPage {
    let size = size.max(1);
    let total_items = products.len();
    let total_pages = total_items.div_ceil(size);
    let content = match page.checked_mul(size) {
        Some(start) => products.into_iter().skip(start).take(size).collect(),
        None => Vec::new(),
    };

    ProductPage {
        content,
        number: page,
        total_pages,
        total_items: total_items as u64,
    }
}

/// Aggregate stock and value, overall and per category
pub fn compute_metrics(products: &[Product]) -> InventoryMetrics {
    let mut groups: BTreeMap<String, Vec<&Product>> = BTreeMap::new();
    for product in products {
        groups
            .entry(product.category.clone())
            .or_default()
            .push(product);
    }

    let by_category = groups
        .into_iter()
        .map(|(category, items)| (category, summarize(&items)))
        .collect();

    let all: Vec<&Product> = products.iter().collect();
    InventoryMetrics {
        overall: summarize(&all),
        by_category,
    }
}

fn summarize(products: &[&Product]) -> StockSummary {
    if products.is_empty() {
        return StockSummary::default();
    }
    let total_value = products.iter().map(|p| p.stock_value()).sum();
    let total_stock = products
        .iter()
        .map(|p| u64::from(p.quantity_in_stock))
        .sum();
    let price_sum: f64 = products.iter().map(|p| p.unit_price).sum();

    StockSummary {
        total_value,
        total_stock,
        average_price: price_sum / products.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProductForm;
    use chrono::NaiveDate;

    fn product(id: &str, name: &str, category: &str, price: f64, stock: u32) -> Product {
        Product::new(id, ProductForm::new(name, category, price, stock))
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_in_stock_only_scenario() {
        let products = vec![
            product("1", "Apple", "Fruit", 1.0, 0),
            product("2", "Banana", "Fruit", 0.5, 5),
        ];
        let filter = FilterSpec::new().in_stock(true);

        let result = derive_view(&products, &filter, &SortSpec::new());
        assert_eq!(names(&result), vec!["Banana"]);
    }

    #[test]
    fn test_multi_key_sort_scenario() {
        let products = vec![
            product("1", "Banana", "Fruit", 0.5, 5),
            product("2", "Apple", "Fruit", 1.0, 3),
            product("3", "Milk", "Dairy", 1.2, 8),
        ];
        let sort = SortSpec::from_keys([
            SortKey::asc(SortColumn::Category),
            SortKey::desc(SortColumn::Name),
        ]);

        let result = derive_view(&products, &FilterSpec::new(), &sort);
        assert_eq!(names(&result), vec!["Milk", "Banana", "Apple"]);
    }

    #[test]
    fn test_sort_is_idempotent_and_stable() {
        let products = vec![
            product("1", "Pear", "Fruit", 2.0, 1),
            product("2", "Plum", "Fruit", 2.0, 1),
            product("3", "Fig", "Fruit", 1.0, 1),
            product("4", "Kiwi", "Fruit", 2.0, 1),
        ];
        let sort = SortSpec::from_keys([SortKey::asc(SortColumn::UnitPrice)]);

        let once = derive_view(&products, &FilterSpec::new(), &sort);
        let twice = derive_view(&once, &FilterSpec::new(), &sort);

        // Equal prices keep their input order
        assert_eq!(names(&once), vec!["Fig", "Pear", "Plum", "Kiwi"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_dates_sort_last_both_ways() {
        let dated = |id: &str, d: Option<NaiveDate>| {
            let mut form = ProductForm::new(id, "Dairy", 1.0, 1);
            form.expiration_date = d;
            Product::new(id, form)
        };
        let products = vec![
            dated("none", None),
            dated("late", NaiveDate::from_ymd_opt(2027, 1, 1)),
            dated("early", NaiveDate::from_ymd_opt(2026, 1, 1)),
        ];

        let asc = SortSpec::from_keys([SortKey::asc(SortColumn::ExpirationDate)]);
        let desc = SortSpec::from_keys([SortKey::desc(SortColumn::ExpirationDate)]);

        let asc_ids: Vec<_> = derive_view(&products, &FilterSpec::new(), &asc)
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        let desc_ids: Vec<_> = derive_view(&products, &FilterSpec::new(), &desc)
            .iter()
            .map(|p| p.id().to_string())
            .collect();

        assert_eq!(asc_ids, vec!["early", "late", "none"]);
        assert_eq!(desc_ids, vec!["late", "early", "none"]);
    }

    #[test]
    fn test_text_order_ignores_case_first() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Banana", "cherry"), Ordering::Less);
        assert_eq!(compare_text("a", "A"), Ordering::Greater);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_numeric_columns_compare_numerically() {
        let products = vec![
            product("1", "A", "X", 10.0, 100),
            product("2", "B", "X", 9.5, 20),
            product("3", "C", "X", 100.0, 3),
        ];
        let by_stock = SortSpec::from_keys([SortKey::asc(SortColumn::QuantityInStock)]);
        let by_price = SortSpec::from_keys([SortKey::desc(SortColumn::UnitPrice)]);

        assert_eq!(
            names(&derive_view(&products, &FilterSpec::new(), &by_stock)),
            vec!["C", "B", "A"]
        );
        assert_eq!(
            names(&derive_view(&products, &FilterSpec::new(), &by_price)),
            vec!["C", "A", "B"]
        );
    }

    #[test]
    fn test_paginate() {
        let products: Vec<_> = (0..23)
            .map(|i| product(&i.to_string(), &format!("P{:02}", i), "X", 1.0, 1))
            .collect();

        let page = paginate(products.clone(), 2, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 23);
        assert_eq!(page.number, 2);
        assert_eq!(page.content.len(), 3);

        let beyond = paginate(products, 5, 10);
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_pages, 3);

        let empty = paginate(Vec::new(), 0, 10);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_paginate_huge_page_is_empty() {
        let products = vec![product("1", "Apple", "Fruit", 1.0, 0)];
        let page = paginate(products, usize::MAX / 10 + 1, 10);

        assert!(page.content.is_empty());
        assert_eq!(page.number, usize::MAX / 10 + 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_compute_metrics() {
        let products = vec![
            product("1", "Apple", "Fruit", 1.0, 10),
            product("2", "Banana", "Fruit", 3.0, 0),
            product("3", "Milk", "Dairy", 2.0, 4),
        ];
        let metrics = compute_metrics(&products);

        assert_eq!(metrics.overall.total_stock, 14);
        assert_eq!(metrics.overall.total_value, 18.0);
        assert_eq!(metrics.overall.average_price, 2.0);

        let fruit = metrics.category("Fruit").unwrap();
        assert_eq!(fruit.total_stock, 10);
        assert_eq!(fruit.total_value, 10.0);
        assert_eq!(fruit.average_price, 2.0);

        assert_eq!(compute_metrics(&[]).overall, StockSummary::default());
    }
}
