//! Product store - the single owner of browse state and loaded content
//!
//! The store is server-driven: every filter, sort or page change re-fetches
//! the page from the backend, and every successful mutation re-fetches the
//! current page instead of patching it locally. Views read it through
//! [`ProductStore::view`] and change it only through its operations.
//!
//! Fetches are sequence-numbered. [`ProductStore::begin_fetch`] hands out a
//! [`FetchTicket`]; [`ProductStore::finish_fetch`] applies a response only if
//! its ticket is the most recent one, so a slow, superseded response can never
//! overwrite a newer page.

use std::collections::BTreeSet;

use crate::core::client::InventoryApi;
use crate::core::error::{InventoryError, InventoryResult};
use crate::core::filter::FilterSpec;
use crate::core::query::ListQuery;
use crate::core::sort::{SortColumn, SortSpec};
use crate::core::state::BrowseState;
use crate::entities::{InventoryMetrics, Product, ProductForm, ProductId, ProductPage};
use crate::schema::FormValidator;

/// A page request in flight
#[derive(Debug, Clone)]
pub struct FetchTicket {
    seq: u64,
    query: ListQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

/// What happened to a finished fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response became the visible page
    Applied,
    /// A newer fetch was issued meanwhile; the response was dropped
    Stale,
    /// The cursor was past the last page and has been clamped; fetch again
    Clamped,
}

/// Read-only projection for rendering. An error hides stale content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreView<'a> {
    Loading,
    Error(&'a str),
    Ready(PageView<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageView<'a> {
    pub products: &'a [Product],
    pub page: usize,
    pub total_pages: usize,
    pub total_items: u64,
    pub filter: &'a FilterSpec,
    pub sort: &'a SortSpec,
}

pub struct ProductStore<A> {
    api: A,
    validator: FormValidator,
    state: BrowseState,
    products: Vec<Product>,
    categories: BTreeSet<String>,
    metrics: Option<InventoryMetrics>,
    loading: bool,
    error: Option<String>,
    issued: u64,
}

impl<A: InventoryApi> ProductStore<A> {
    pub fn new(api: A, page_size: usize) -> Self {
        Self {
            api,
            validator: FormValidator::new(),
            state: BrowseState::new(page_size),
            products: Vec::new(),
            categories: BTreeSet::new(),
            metrics: None,
            loading: false,
            error: None,
            issued: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn metrics(&self) -> Option<&InventoryMetrics> {
        self.metrics.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn view(&self) -> StoreView<'_> {
        if let Some(message) = &self.error {
            return StoreView::Error(message);
        }
        if self.loading {
            return StoreView::Loading;
        }
        StoreView::Ready(PageView {
            products: &self.products,
            page: self.state.page(),
            total_pages: self.state.total_pages(),
            total_items: self.state.total_items(),
            filter: self.state.filter(),
            sort: self.state.sort(),
        })
    }

    // =========================================================================
    // Fetch sequencing
    // =========================================================================

    /// Issue a ticket for the page described by the current state.
    /// Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket {
            seq: self.issued,
            query: self.state.query(),
        }
    }

    /// Apply a fetch result if its ticket is still the latest.
    ///
    /// A failed latest fetch sets the error state and is returned as `Err`;
    /// the previous page content is left in place underneath the error.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: InventoryResult<ProductPage>,
    ) -> InventoryResult<FetchOutcome> {
        if ticket.seq != self.issued {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued,
                "discarding superseded product page"
            );
            return Ok(FetchOutcome::Stale);
        }

        self.loading = false;
        match result {
            Ok(page) => {
                let clamped = self.state.record_page(&page);
                self.products = page.content;
                self.error = None;
                if clamped {
                    tracing::debug!(page = self.state.page(), "page cursor clamped");
                    Ok(FetchOutcome::Clamped)
                } else {
                    Ok(FetchOutcome::Applied)
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load products");
                self.error = Some(format!("Error loading products: {}", err));
                Err(err)
            }
        }
    }

    /// Fetch the page for the current state
    pub async fn refresh(&mut self) -> InventoryResult<()> {
        loop {
            let ticket = self.begin_fetch();
            let result = self.api.list(ticket.query()).await;
            match self.finish_fetch(ticket, result)? {
                FetchOutcome::Clamped => continue,
                FetchOutcome::Applied | FetchOutcome::Stale => return Ok(()),
            }
        }
    }

    // =========================================================================
    // Browse intents
    // =========================================================================

    pub async fn apply_filters(&mut self, filter: FilterSpec) -> InventoryResult<()> {
        self.state.apply_filters(filter);
        self.refresh().await
    }

    pub async fn toggle_sort(&mut self, column: SortColumn) -> InventoryResult<()> {
        self.state.toggle_sort(column);
        self.refresh().await
    }

    pub async fn set_sort(&mut self, sort: SortSpec) -> InventoryResult<()> {
        self.state.set_sort(sort);
        self.refresh().await
    }

    pub async fn reset_filters(&mut self) -> InventoryResult<()> {
        self.state.reset_filters();
        self.refresh().await
    }

    /// Go to page `n`. Out-of-range pages are ignored and return `Ok(false)`.
    pub async fn set_page(&mut self, n: usize) -> InventoryResult<bool> {
        if !self.state.set_page(n) {
            tracing::debug!(page = n, total = self.state.total_pages(), "page out of range");
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    pub async fn next_page(&mut self) -> InventoryResult<bool> {
        self.set_page(self.state.page() + 1).await
    }

    pub async fn prev_page(&mut self) -> InventoryResult<bool> {
        match self.state.page().checked_sub(1) {
            Some(n) => self.set_page(n).await,
            None => Ok(false),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a product, then re-fetch the current page.
    ///
    /// Returns `Ok` once the backend accepts the product, even if the
    /// re-fetch fails; check [`ProductStore::error`] for that.
    pub async fn create(&mut self, form: ProductForm) -> InventoryResult<Product> {
        self.validator.validate(&form)?;
        let created = match self.api.create(&form).await {
            Ok(product) => product,
            Err(err) => return Err(self.mutation_failed("creating", err)),
        };
        tracing::info!(id = %created.id(), name = %created.name, "product created");
        self.after_mutation().await;
        Ok(created)
    }

    /// Update a product, then re-fetch the current page
    pub async fn update(&mut self, id: &ProductId, form: ProductForm) -> InventoryResult<Product> {
        self.validator.validate(&form)?;
        let updated = match self.api.update(id, &form).await {
            Ok(product) => product,
            Err(err) => return Err(self.mutation_failed("updating", err)),
        };
        tracing::info!(id = %id, "product updated");
        self.after_mutation().await;
        Ok(updated)
    }

    /// Delete a product, then re-fetch the current page
    pub async fn delete(&mut self, id: &ProductId) -> InventoryResult<()> {
        if let Err(err) = self.api.delete(id).await {
            return Err(self.mutation_failed("deleting", err));
        }
        tracing::info!(id = %id, "product deleted");
        self.after_mutation().await;
        Ok(())
    }

    fn mutation_failed(&mut self, action: &str, err: InventoryError) -> InventoryError {
        tracing::error!(error = %err, "failed {} product", action);
        self.error = Some(format!("Error {} product: {}", action, err));
        err
    }

    /// Reload after a mutation the backend has already accepted.
    ///
    /// The mutation's own result is still returned to the caller; a failed
    /// reload only shows up in the error state.
    async fn after_mutation(&mut self) {
        if self.refresh().await.is_err() {
            return;
        }
        if self.metrics.is_some() {
            if let Err(err) = self.load_metrics().await {
                self.error = Some(format!("Error loading metrics: {}", err));
            }
        }
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    pub async fn load_categories(&mut self) -> InventoryResult<&BTreeSet<String>> {
        match self.api.categories().await {
            Ok(categories) => {
                self.categories = categories;
                Ok(&self.categories)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load categories");
                Err(err)
            }
        }
    }

    pub async fn load_metrics(&mut self) -> InventoryResult<&InventoryMetrics> {
        match self.api.metrics().await {
            Ok(metrics) => Ok(self.metrics.insert(metrics)),
            Err(err) => {
                tracing::error!(error = %err, "failed to load metrics");
                Err(err)
            }
        }
    }
}
