//! Remote inventory client
//!
//! [`InventoryApi`] is the seam between the product store and the transport.
//! [`HttpInventoryClient`] implements it against the inventory service's HTTP
//! contract; [`crate::core::local::LocalInventory`] implements it in memory.
//!
//! Calls are at-most-once: there is no retry and no idempotency key.

use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::future::Future;

use crate::core::config::{Config, ConfigError};
use crate::core::error::{InventoryError, InventoryResult};
use crate::core::query::ListQuery;
use crate::entities::{InventoryMetrics, Product, ProductForm, ProductId, ProductPage};

/// Operations offered by an inventory backend
pub trait InventoryApi {
    /// `GET /products` with filter, sort and page parameters
    fn list(&self, query: &ListQuery) -> impl Future<Output = InventoryResult<ProductPage>> + Send;

    /// `POST /products`
    fn create(&self, form: &ProductForm) -> impl Future<Output = InventoryResult<Product>> + Send;

    /// `PUT /products/{id}`
    fn update(
        &self,
        id: &ProductId,
        form: &ProductForm,
    ) -> impl Future<Output = InventoryResult<Product>> + Send;

    /// `DELETE /products/{id}`
    fn delete(&self, id: &ProductId) -> impl Future<Output = InventoryResult<()>> + Send;

    /// `GET /products/categories`
    fn categories(&self) -> impl Future<Output = InventoryResult<BTreeSet<String>>> + Send;

    /// `GET /products/metrics`
    fn metrics(&self) -> impl Future<Output = InventoryResult<InventoryMetrics>> + Send;
}

/// Page size used when scanning for a single product
const SCAN_PAGE_SIZE: usize = 100;

/// Locate a product by id.
///
/// The contract has no single-product endpoint, so this walks unfiltered
/// pages until the id turns up or the pages run out.
pub async fn find_product<A: InventoryApi>(api: &A, id: &ProductId) -> InventoryResult<Product> {
    let mut page = 0;
    loop {
        let result = api.list(&ListQuery::page(page, SCAN_PAGE_SIZE)).await?;
        if let Some(product) = result.content.into_iter().find(|p| p.id() == id) {
            return Ok(product);
        }
        page += 1;
        if page >= result.total_pages {
            return Err(InventoryError::NotFound { id: id.to_string() });
        }
    }
}

/// Fetch every product, page by page, without filter or sort
pub async fn fetch_all<A: InventoryApi>(api: &A, page_size: usize) -> InventoryResult<Vec<Product>> {
    let mut products = Vec::new();
    let mut page = 0;
    loop {
        let result = api.list(&ListQuery::page(page, page_size)).await?;
        products.extend(result.content);
        page += 1;
        if page >= result.total_pages {
            return Ok(products);
        }
    }
}

/// HTTP client for the inventory service
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpInventoryClient {
    /// Build a client from configuration (base URL and timeout)
    pub fn new(config: &Config) -> InventoryResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|_| ConfigError::InvalidValue {
            key: "base_url",
            value: config.base_url.clone(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "base_url",
                value: config.base_url.clone(),
            }
            .into());
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Turn non-2xx responses into `InventoryError::Server`
    async fn check(response: Response) -> InventoryResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        } else {
            body
        };
        tracing::error!(
            status = %status,
            body = %message,
            "unexpected response from inventory service"
        );
        Err(InventoryError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> InventoryResult<T> {
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(error = %e, "could not decode inventory response");
            InventoryError::Decode {
                message: e.to_string(),
            }
        })
    }
}

impl InventoryApi for HttpInventoryClient {
    #[tracing::instrument(level = "debug", skip(self), fields(page = query.page, size = query.size))]
    async fn list(&self, query: &ListQuery) -> InventoryResult<ProductPage> {
        let response = self
            .client
            .get(self.endpoint(&["products"]))
            .query(&query.to_pairs())
            .send()
            .await?;
        let page: ProductPage = Self::read_json(response).await?;
        tracing::debug!(
            items = page.content.len(),
            total_pages = page.total_pages,
            "received product page"
        );
        Ok(page)
    }

    #[tracing::instrument(level = "debug", skip(self, form), fields(name = %form.name))]
    async fn create(&self, form: &ProductForm) -> InventoryResult<Product> {
        let response = self
            .client
            .post(self.endpoint(&["products"]))
            .json(form)
            .send()
            .await?;
        Self::read_json(response).await
    }

    #[tracing::instrument(level = "debug", skip(self, form), fields(id = %id))]
    async fn update(&self, id: &ProductId, form: &ProductForm) -> InventoryResult<Product> {
        let response = self
            .client
            .put(self.endpoint(&["products", id.as_str()]))
            .json(form)
            .send()
            .await?;
        Self::read_json(response).await
    }

    #[tracing::instrument(level = "debug", skip(self), fields(id = %id))]
    async fn delete(&self, id: &ProductId) -> InventoryResult<()> {
        let response = self
            .client
            .delete(self.endpoint(&["products", id.as_str()]))
            .send()
            .await?;
        let response = Self::check(response).await?;
        if response.status() != StatusCode::NO_CONTENT {
            tracing::debug!(status = %response.status(), "delete answered with a body");
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn categories(&self) -> InventoryResult<BTreeSet<String>> {
        let response = self
            .client
            .get(self.endpoint(&["products", "categories"]))
            .send()
            .await?;
        let categories: Vec<String> = Self::read_json(response).await?;
        Ok(categories.into_iter().collect())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn metrics(&self) -> InventoryResult<InventoryMetrics> {
        let response = self
            .client
            .get(self.endpoint(&["products", "metrics"]))
            .send()
            .await?;
        Self::read_json(response).await
    }
}
