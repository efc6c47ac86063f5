//! Shared test helpers for integration tests
//!
//! Spins up an in-process inventory service speaking the same HTTP contract
//! as the real one, backed by `LocalInventory`.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

use invman::core::config::{BASE_URL_ENV, CONFIG_ENV, PAGE_SIZE_ENV};
use invman::core::{
    Config, FilterSpec, HttpInventoryClient, InventoryApi, InventoryError, ListQuery,
    LocalInventory, SortKey, SortSpec,
};
use invman::entities::{ProductForm, ProductId};

/// Helper to get an invman command isolated from the user's configuration
pub fn invman() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("invman"));
    cmd.env(
        CONFIG_ENV,
        std::env::temp_dir().join("invman-tests-missing-config.yaml"),
    )
    .env_remove(BASE_URL_ENV)
    .env_remove(PAGE_SIZE_ENV)
    .env_remove("INVMAN_LOG")
    .env_remove("RUST_LOG");
    cmd
}

/// The fixture every test service starts with
pub fn sample_forms() -> Vec<ProductForm> {
    vec![
        ProductForm::new("Apple", "Fruit", 1.0, 0),
        ProductForm::new("Banana", "Fruit", 0.5, 5),
        ProductForm::new("Milk", "Dairy", 1.2, 8)
            .expiring(NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()),
        ProductForm::new("Bread", "Bakery", 2.5, 3),
    ]
}

struct ServiceState {
    inventory: LocalInventory,
    queries: Mutex<Vec<String>>,
}

/// A running fake inventory service
pub struct TestService {
    pub base_url: String,
    pub ids: Vec<ProductId>,
    state: Arc<ServiceState>,
}

impl TestService {
    /// Start a service seeded with [`sample_forms`]
    pub fn start() -> Self {
        Self::start_with(sample_forms())
    }

    /// Start a service seeded with `forms`, in insertion order
    pub fn start_with(forms: Vec<ProductForm>) -> Self {
        let inventory = LocalInventory::new();
        let ids = inventory.seed(forms);
        let state = Arc::new(ServiceState {
            inventory,
            queries: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route("/products/categories", get(categories))
            .route("/products/metrics", get(metrics))
            .route("/products/:id", put(update_product).delete(delete_product))
            .with_state(Arc::clone(&state));

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });
        let addr = rx.recv().unwrap();

        Self {
            base_url: format!("http://{}", addr),
            ids,
            state,
        }
    }

    pub fn client(&self) -> HttpInventoryClient {
        let config = Config {
            base_url: self.base_url.clone(),
            ..Config::default()
        };
        HttpInventoryClient::new(&config).unwrap()
    }

    pub fn product_count(&self) -> usize {
        self.state.inventory.len()
    }

    pub fn names(&self) -> Vec<String> {
        self.state
            .inventory
            .snapshot()
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    /// Raw query strings of every `GET /products`, oldest first
    pub fn queries(&self) -> Vec<String> {
        self.state.queries.lock().unwrap().clone()
    }
}

/// Parse `GET /products` query parameters the way the service does
fn parse_list_query(raw: &str) -> ListQuery {
    let url = reqwest::Url::parse(&format!("http://service/?{}", raw)).unwrap();
    let mut filter = FilterSpec::new();
    let mut keys = Vec::new();
    let mut page = 0;
    let mut size = 10;

    for (key, value) in url.query_pairs() {
        match &*key {
            "name" => filter.name = value.into_owned(),
            "categories" => {
                filter.categories.insert(value.into_owned());
            }
            "inStock" => filter.in_stock_only = value == "true",
            "sort" => {
                if let Ok(key) = value.parse::<SortKey>() {
                    keys.push(key);
                }
            }
            "page" => page = value.parse().unwrap_or(0),
            "size" => size = value.parse().unwrap_or(10),
            _ => {}
        }
    }

    ListQuery {
        filter,
        sort: SortSpec::from_keys(keys),
        page,
        size,
    }
}

fn error_response(err: InventoryError) -> Response {
    match err {
        InventoryError::Server { status, message } => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message,
        )
            .into_response(),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response(),
    }
}

async fn list_products(State(state): State<Arc<ServiceState>>, RawQuery(raw): RawQuery) -> Response {
    let raw = raw.unwrap_or_default();
    state.queries.lock().unwrap().push(raw.clone());
    match state.inventory.list(&parse_list_query(&raw)).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_product(
    State(state): State<Arc<ServiceState>>,
    Json(form): Json<ProductForm>,
) -> Response {
    match state.inventory.create(&form).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_product(
    State(state): State<Arc<ServiceState>>,
    Path(id): Path<String>,
    Json(form): Json<ProductForm>,
) -> Response {
    match state.inventory.update(&ProductId::from(id), &form).await {
        Ok(product) => Json(product).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_product(State(state): State<Arc<ServiceState>>, Path(id): Path<String>) -> Response {
    match state.inventory.delete(&ProductId::from(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn categories(State(state): State<Arc<ServiceState>>) -> Response {
    match state.inventory.categories().await {
        Ok(categories) => Json(categories).into_response(),
        Err(err) => error_response(err),
    }
}

async fn metrics(State(state): State<Arc<ServiceState>>) -> Response {
    match state.inventory.metrics().await {
        Ok(metrics) => Json(metrics).into_response(),
        Err(err) => error_response(err),
    }
}
