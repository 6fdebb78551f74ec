use cart_match::{
    populate_if_empty, AvailabilityStatus, CatalogRefresher, CatalogSource, CatalogStore,
    HttpCatalogSource,
};
use httpmock::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_fetch_products_from_catalog_service() {
    let server = MockServer::start();
    let mock_data = serde_json::json!([
        {"id": "prod_001", "name": "Long Grain Rice (5kg)", "category": "grains", "price": 3500, "availability_status": "available"},
        {"id": "prod_003", "name": "Fresh Chicken (1kg)", "category": "proteins", "price": 5500, "availability_status": "unavailable"},
        {"id": "prod_bad", "name": "Mystery", "price": null}
    ]);

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(mock_data);
    });

    let source = HttpCatalogSource::new(server.url("/products"));
    let products = source.fetch_products().await.unwrap();

    api_mock.assert();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0].id, "prod_001");
    assert_eq!(products[1].availability_status, AvailabilityStatus::Unavailable);
    assert_eq!(products[2].price, 0.0);
    assert_eq!(products[2].category, "");
}

#[tokio::test]
async fn test_custom_headers_are_sent() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/catalog")
            .header("Authorization", "Bearer secret-token");
        then.status(200).json_body(serde_json::json!({"products": []}));
    });

    let mut headers = HashMap::new();
    headers.insert("Authorization".to_string(), "Bearer secret-token".to_string());
    let source = HttpCatalogSource::new(server.url("/catalog"))
        .with_headers(headers)
        .with_timeout(Duration::from_secs(5));

    let products = source.fetch_products().await.unwrap();

    api_mock.assert();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/failed");
        then.status(500);
    });

    let source = HttpCatalogSource::new(server.url("/failed"));
    let err = source.fetch_products().await.unwrap_err();

    api_mock.assert();
    assert!(err.is_retryable());
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_failed_on_demand_load_leaves_store_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/down");
        then.status(503);
    });

    let store = CatalogStore::new();
    let source = HttpCatalogSource::new(server.url("/down"));

    assert!(!populate_if_empty(&store, &source).await);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_refresh_failure_keeps_serving_last_good_catalog() {
    let server = MockServer::start();
    let mut ok_mock = server.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(200).json_body(serde_json::json!([
            {"id": "p1", "name": "Palm Oil (1L)", "category": "oils", "price": 2500}
        ]));
    });

    let store = Arc::new(CatalogStore::new());
    let refresher = CatalogRefresher::new(
        Arc::clone(&store),
        Arc::new(HttpCatalogSource::new(server.url("/products"))),
        Duration::from_secs(600),
    );

    tokio_test::assert_ok!(refresher.refresh_once().await);
    let good = store.current_snapshot();
    assert_eq!(good.len(), 1);

    ok_mock.delete();
    server.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(502);
    });

    tokio_test::assert_err!(refresher.refresh_once().await);
    let after = store.current_snapshot();
    assert!(Arc::ptr_eq(&good, &after));
    assert_eq!(after.products()[0].name, "Palm Oil (1L)");
}
