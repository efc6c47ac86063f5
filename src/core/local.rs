//! In-memory inventory backend
//!
//! Implements [`InventoryApi`] over a local product set using the pure
//! derivation functions in [`crate::core::view`]. Backs `product list --local`
//! (fetch once, filter and sort client-side) and serves as the in-process
//! service in tests.

use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use ulid::Ulid;

use crate::core::client::InventoryApi;
use crate::core::error::{InventoryError, InventoryResult};
use crate::core::query::ListQuery;
use crate::core::view::{compute_metrics, derive_view, paginate};
use crate::entities::{InventoryMetrics, Product, ProductForm, ProductId, ProductPage};

#[derive(Debug, Default)]
pub struct LocalInventory {
    products: Mutex<Vec<Product>>,
}

impl LocalInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing product set, e.g. one fetched from the service
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }

    /// Insert forms as new products, returning the assigned ids
    pub fn seed(&self, forms: impl IntoIterator<Item = ProductForm>) -> Vec<ProductId> {
        let mut products = self.lock();
        forms
            .into_iter()
            .map(|form| {
                let product = Self::stamp_new(form);
                let id = product.id().clone();
                products.push(product);
                id
            })
            .collect()
    }

    /// Copy of every stored product in insertion order
    pub fn snapshot(&self) -> Vec<Product> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stamp_new(form: ProductForm) -> Product {
        let now = Utc::now();
        Product::new(Ulid::new().to_string(), form).with_timestamps(Some(now), Some(now))
    }

    fn not_found(id: &ProductId) -> InventoryError {
        InventoryError::Server {
            status: 404,
            message: format!("Product not found with id {}", id),
        }
    }
}

impl InventoryApi for LocalInventory {
    async fn list(&self, query: &ListQuery) -> InventoryResult<ProductPage> {
        let products = self.lock();
        let visible = derive_view(&products, &query.filter, &query.sort);
        Ok(paginate(visible, query.page, query.size))
    }

    async fn create(&self, form: &ProductForm) -> InventoryResult<Product> {
        let product = Self::stamp_new(form.clone());
        tracing::debug!(id = %product.id(), "created local product");
        self.lock().push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: &ProductId, form: &ProductForm) -> InventoryResult<Product> {
        let mut products = self.lock();
        let product = products
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| Self::not_found(id))?;

        product.apply_form(form.clone());
        let created = product.creation_date();
        *product = product.clone().with_timestamps(created, Some(Utc::now()));
        Ok(product.clone())
    }

    async fn delete(&self, id: &ProductId) -> InventoryResult<()> {
        let mut products = self.lock();
        let before = products.len();
        products.retain(|p| p.id() != id);
        if products.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn categories(&self) -> InventoryResult<BTreeSet<String>> {
        Ok(self.lock().iter().map(|p| p.category.clone()).collect())
    }

    async fn metrics(&self) -> InventoryResult<InventoryMetrics> {
        Ok(compute_metrics(&self.lock()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterSpec;

    fn inventory() -> LocalInventory {
        let inv = LocalInventory::new();
        inv.seed([
            ProductForm::new("Apple", "Fruit", 1.0, 0),
            ProductForm::new("Banana", "Fruit", 0.5, 5),
            ProductForm::new("Milk", "Dairy", 1.2, 8),
        ]);
        inv
    }

    #[tokio::test]
    async fn test_list_applies_filter_and_page() {
        let inv = inventory();
        let mut query = ListQuery::page(0, 2);
        query.filter = FilterSpec::new().in_stock(true);

        let page = inv.list(&query).await.unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 1);
        assert!(page.content.iter().all(|p| p.quantity_in_stock > 0));
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let inv = LocalInventory::new();
        let created = inv
            .create(&ProductForm::new("Bread", "Bakery", 2.0, 3))
            .await
            .unwrap();

        assert!(!created.id().as_str().is_empty());
        assert!(created.creation_date().is_some());
        assert_eq!(inv.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_creation() {
        let inv = inventory();
        let original = inv.snapshot().remove(0);

        let updated = inv
            .update(original.id(), &ProductForm::new("Green Apple", "Fruit", 1.1, 4))
            .await
            .unwrap();

        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.creation_date(), original.creation_date());
        assert_eq!(updated.name, "Green Apple");
    }

    #[tokio::test]
    async fn test_missing_ids_are_404() {
        let inv = inventory();
        let missing = ProductId::from("nope");

        let err = inv.delete(&missing).await.unwrap_err();
        assert_eq!(err.status(), Some(404));

        let err = inv
            .update(&missing, &ProductForm::new("X", "Y", 1.0, 1))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_categories_and_metrics() {
        let inv = inventory();
        let categories = inv.categories().await.unwrap();
        assert_eq!(
            categories.into_iter().collect::<Vec<_>>(),
            vec!["Dairy", "Fruit"]
        );

        let metrics = inv.metrics().await.unwrap();
        assert_eq!(metrics.overall.total_stock, 13);
    }
}
