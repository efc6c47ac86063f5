//! Query parameters for `GET /products`

use crate::core::filter::FilterSpec;
use crate::core::sort::SortSpec;

/// Everything needed to request one page of products
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: FilterSpec,
    pub sort: SortSpec,
    pub page: usize,
    pub size: usize,
}

impl ListQuery {
    /// Unfiltered, unsorted query for one page
    pub fn page(page: usize, size: usize) -> Self {
        Self {
            filter: FilterSpec::default(),
            sort: SortSpec::default(),
            page,
            size,
        }
    }

    /// Encode as query pairs; multi-valued parameters repeat their key.
    ///
    /// Blank names, empty category sets, a false stock flag and an empty
    /// sort are omitted so the service applies its own defaults.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(name) = self.filter.name_term() {
            pairs.push(("name", name.to_string()));
        }
        for category in &self.filter.categories {
            pairs.push(("categories", category.clone()));
        }
        if self.filter.in_stock_only {
            pairs.push(("inStock", "true".to_string()));
        }
        for sort in self.sort.to_params() {
            pairs.push(("sort", sort));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("size", self.size.to_string()));

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sort::{SortColumn, SortKey};

    #[test]
    fn test_plain_page_only_sends_cursor() {
        let pairs = ListQuery::page(3, 10).to_pairs();
        assert_eq!(
            pairs,
            vec![("page", "3".to_string()), ("size", "10".to_string())]
        );
    }

    #[test]
    fn test_full_query_repeats_keys() {
        let query = ListQuery {
            filter: FilterSpec::new()
                .with_name(" milk ")
                .with_category("Dairy")
                .with_category("Bakery")
                .in_stock(true),
            sort: SortSpec::from_keys([
                SortKey::asc(SortColumn::Category),
                SortKey::desc(SortColumn::UnitPrice),
            ]),
            page: 0,
            size: 20,
        };
        let pairs = query.to_pairs();
        let keys: Vec<_> = pairs.iter().map(|(k, _)| *k).collect();

        assert_eq!(
            keys,
            vec!["name", "categories", "categories", "inStock", "sort", "sort", "page", "size"]
        );
        assert_eq!(pairs[0].1, "milk");
        // Categories are emitted in sorted order
        assert_eq!(pairs[1].1, "Bakery");
        assert_eq!(pairs[4].1, "category,asc");
        assert_eq!(pairs[5].1, "unitPrice,desc");
    }
}
