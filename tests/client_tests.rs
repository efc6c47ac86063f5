//! HTTP client and product store tests against an in-process service

mod common;

use common::TestService;
use invman::core::{
    find_product, Config, FilterSpec, HttpInventoryClient, InventoryApi, InventoryError,
    ListQuery, ProductStore, SortColumn, SortKey, SortSpec, StoreView,
};
use invman::entities::{ProductForm, ProductId};

fn names(products: &[invman::entities::Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_first_page() {
    let service = TestService::start();
    let client = service.client();

    let page = client.list(&ListQuery::page(0, 3)).await.unwrap();

    assert_eq!(page.number, 0);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_items, 4);
    assert_eq!(names(&page.content), vec!["Apple", "Banana", "Milk"]);
}

#[tokio::test]
async fn test_list_filter_and_multi_key_sort() {
    let service = TestService::start();
    let client = service.client();

    let query = ListQuery {
        filter: FilterSpec::new().in_stock(true),
        sort: SortSpec::from_keys([SortKey::desc(SortColumn::UnitPrice)]),
        page: 0,
        size: 10,
    };
    let page = client.list(&query).await.unwrap();
    assert_eq!(names(&page.content), vec!["Bread", "Milk", "Banana"]);

    let query = ListQuery {
        filter: FilterSpec::new()
            .with_category("Fruit")
            .with_category("Dairy"),
        sort: SortSpec::from_keys([
            SortKey::asc(SortColumn::Category),
            SortKey::desc(SortColumn::Name),
        ]),
        page: 0,
        size: 10,
    };
    let page = client.list(&query).await.unwrap();
    assert_eq!(names(&page.content), vec!["Milk", "Banana", "Apple"]);
}

#[tokio::test]
async fn test_list_query_encoding() {
    let service = TestService::start();
    let client = service.client();

    let query = ListQuery {
        filter: FilterSpec::new()
            .with_name("  an ")
            .with_category("Fruit")
            .with_category("Dairy"),
        sort: SortSpec::from_keys([
            SortKey::asc(SortColumn::Category),
            SortKey::desc(SortColumn::Name),
        ]),
        page: 1,
        size: 5,
    };
    client.list(&query).await.unwrap();

    let raw = service.queries().pop().unwrap();
    insta::assert_snapshot!(
        raw,
        @"name=an&categories=Dairy&categories=Fruit&sort=category%2Casc&sort=name%2Cdesc&page=1&size=5"
    );
}

#[tokio::test]
async fn test_default_query_omits_empty_filters() {
    let service = TestService::start();
    service.client().list(&ListQuery::page(0, 10)).await.unwrap();

    assert_eq!(service.queries(), vec!["page=0&size=10".to_string()]);
}

#[tokio::test]
async fn test_page_past_end_is_empty() {
    let service = TestService::start();
    let page = service
        .client()
        .list(&ListQuery::page(7, 10))
        .await
        .unwrap();

    assert!(page.content.is_empty());
    assert_eq!(page.total_pages, 1);
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_create_then_find() {
    let service = TestService::start();
    let client = service.client();

    let created = client
        .create(&ProductForm::new("Cheese", "Dairy", 4.75, 2))
        .await
        .unwrap();
    assert!(!created.id().as_str().is_empty());
    assert!(created.creation_date().is_some());

    let found = find_product(&client, created.id()).await.unwrap();
    assert_eq!(found.name, "Cheese");
    assert_eq!(service.product_count(), 5);
}

#[tokio::test]
async fn test_update_keeps_identity() {
    let service = TestService::start();
    let client = service.client();
    let id = service.ids[1].clone();

    let updated = client
        .update(&id, &ProductForm::new("Plantain", "Fruit", 0.8, 12))
        .await
        .unwrap();

    assert_eq!(updated.id(), &id);
    assert_eq!(updated.name, "Plantain");
    assert_eq!(updated.quantity_in_stock, 12);
}

#[tokio::test]
async fn test_delete_removes_from_listing() {
    let service = TestService::start();
    let client = service.client();
    let id = service.ids[0].clone();

    client.delete(&id).await.unwrap();

    let page = client.list(&ListQuery::page(0, 10)).await.unwrap();
    assert!(page.content.iter().all(|p| p.id() != &id));
    assert_eq!(page.total_items, 3);
}

#[tokio::test]
async fn test_missing_product_is_server_404() {
    let service = TestService::start();
    let client = service.client();
    let missing = ProductId::from("does-not-exist");

    let err = client.delete(&missing).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    match err {
        InventoryError::Server { message, .. } => {
            assert!(message.contains("does-not-exist"));
        }
        other => panic!("expected server error, got {:?}", other),
    }

    let err = find_product(&client, &missing).await.unwrap_err();
    assert!(matches!(err, InventoryError::NotFound { .. }));
}

// ============================================================================
// Reference data
// ============================================================================

#[tokio::test]
async fn test_categories_and_metrics() {
    let service = TestService::start();
    let client = service.client();

    let categories: Vec<String> = client.categories().await.unwrap().into_iter().collect();
    assert_eq!(categories, vec!["Bakery", "Dairy", "Fruit"]);

    let metrics = client.metrics().await.unwrap();
    assert_eq!(metrics.overall.total_stock, 16);
    let fruit = metrics.category("Fruit").unwrap();
    assert_eq!(fruit.total_stock, 5);
    assert!((fruit.total_value - 2.5).abs() < 1e-9);
    assert!((fruit.average_price - 0.75).abs() < 1e-9);
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let config = Config {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 5,
        ..Config::default()
    };
    let client = HttpInventoryClient::new(&config).unwrap();

    let err = client.list(&ListQuery::page(0, 10)).await.unwrap_err();
    assert!(err.is_network(), "expected network error, got {:?}", err);
}

// ============================================================================
// Product store over HTTP
// ============================================================================

#[tokio::test]
async fn test_store_filters_and_pages() {
    let service = TestService::start();
    let mut store = ProductStore::new(service.client(), 2);

    store.refresh().await.unwrap();
    assert_eq!(store.state().total_pages(), 2);

    assert!(store.next_page().await.unwrap());
    assert_eq!(names(store.products()), vec!["Milk", "Bread"]);
    assert!(!store.next_page().await.unwrap());

    store
        .apply_filters(FilterSpec::new().with_name("a"))
        .await
        .unwrap();
    assert_eq!(store.state().page(), 0);
    match store.view() {
        StoreView::Ready(view) => {
            assert_eq!(view.total_items, 3);
            assert_eq!(names(view.products), vec!["Apple", "Banana"]);
        }
        other => panic!("expected ready view, got {:?}", other),
    }
}

#[tokio::test]
async fn test_store_delete_last_item_clamps_page() {
    let service = TestService::start();
    let mut store = ProductStore::new(service.client(), 3);
    store.refresh().await.unwrap();
    assert!(store.set_page(1).await.unwrap());
    assert_eq!(names(store.products()), vec!["Bread"]);

    let bread = store.products()[0].id().clone();
    store.delete(&bread).await.unwrap();

    assert_eq!(store.state().page(), 0);
    assert_eq!(store.state().total_pages(), 1);
    assert_eq!(names(store.products()), vec!["Apple", "Banana", "Milk"]);
}

#[tokio::test]
async fn test_store_rejects_invalid_form_without_request() {
    let service = TestService::start();
    let mut store = ProductStore::new(service.client(), 10);
    store.refresh().await.unwrap();

    let err = store
        .create(ProductForm::new("", "Dairy", -1.0, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, InventoryError::Validation(_)));
    assert_eq!(service.product_count(), 4);
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_store_failed_update_shows_error() {
    let service = TestService::start();
    let mut store = ProductStore::new(service.client(), 10);
    store.refresh().await.unwrap();

    let err = store
        .update(
            &ProductId::from("gone"),
            ProductForm::new("Ghost", "None", 1.0, 1),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    match store.view() {
        StoreView::Error(message) => assert!(message.starts_with("Error updating product")),
        other => panic!("expected error view, got {:?}", other),
    }
}
