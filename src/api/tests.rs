//! Behavior tests for the request pipeline against a mock backend.
//!
//! Uses an in-memory token store so the session-expiry side effect is
//! observable, and a mockito server standing in for the storefront API.

mod pipeline_tests {
    use std::sync::Arc;

    use mockito::{Matcher, Server, ServerGuard};
    use reqwest::Method;
    use serde_json::{json, Value};

    use crate::api::client::ApiClient;
    use crate::api::error::{ApiError, UNKNOWN_ERROR_DETAIL};
    use crate::api::store::{MemoryStore, TokenStore};
    use crate::api::{account, cart, catalog, orders};

    // ── Helpers ──────────────────────────────────────────────────────────

    fn test_client(server: &ServerGuard) -> (ApiClient, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let client = ApiClient::new(&server.url(), store.clone());
        (client, store)
    }

    fn category_json(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": null,
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00",
        })
    }

    // ── Response classification ──────────────────────────────────────────

    #[tokio::test]
    async fn test_204_resolves_to_empty_result() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/cart/")
            .with_status(204)
            .create_async()
            .await;

        let (client, store) = test_client(&server);
        store.save("abc123").unwrap();

        cart::clear(&client).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_success_without_json_content_type_is_empty() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/health")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("ok")
            .create_async()
            .await;

        let (client, _store) = test_client(&server);
        let result: Option<Value> = client
            .execute::<(), Value>(Method::GET, "/api/health", None, false)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_success_array_is_preserved_in_order() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/categories/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([category_json(2, "Skincare"), category_json(1, "Makeup")]).to_string(),
            )
            .create_async()
            .await;

        let (client, _store) = test_client(&server);
        let categories = catalog::list_categories(&client).await.unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].id, 2);
        assert_eq!(categories[0].name, "Skincare");
        assert_eq!(categories[1].id, 1);
        assert_eq!(categories[1].name, "Makeup");
    }

    #[tokio::test]
    async fn test_error_detail_is_extracted() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/cart/items")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(json!({"detail": "Insufficient stock"}).to_string())
            .create_async()
            .await;

        let (client, store) = test_client(&server);
        store.save("abc123").unwrap();

        let err = cart::add_item(&client, 5, 99).await.unwrap_err();
        match err {
            ApiError::Api { detail } => assert_eq!(detail, "Insufficient stock"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body_falls_back() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/products/7")
            .with_status(500)
            .with_header("content-type", "text/html")
            .with_body("<html>Internal Server Error</html>")
            .create_async()
            .await;

        let (client, _store) = test_client(&server);
        let err = catalog::get_product(&client, 7).await.unwrap_err();
        match err {
            ApiError::Api { detail } => assert_eq!(detail, UNKNOWN_ERROR_DETAIL),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    // ── Bearer token handling ────────────────────────────────────────────

    #[tokio::test]
    async fn test_bearer_header_attached_when_token_present() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/cart/summary")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": 1, "total_items": 2, "total_amount": 40.0}).to_string())
            .create_async()
            .await;

        let (client, store) = test_client(&server);
        store.save("tok-123").unwrap();

        let summary = cart::summary(&client).await.unwrap();
        assert_eq!(summary.total_items, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_bearer_header_when_token_absent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/cart/")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"id": 1, "user_id": 9, "items": [], "total_items": 0, "total_amount": 0})
                    .to_string(),
            )
            .create_async()
            .await;

        let (client, _store) = test_client(&server);
        let detail = cart::fetch(&client).await.unwrap();
        assert!(detail.items.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_clears_store_and_fails_expired() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/cart/")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(json!({"detail": "Could not validate credentials"}).to_string())
            .create_async()
            .await;

        let (client, store) = test_client(&server);
        store.save("abc123").unwrap();

        let err = cart::fetch(&client).await.unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired));
        assert_eq!(store.read(), None);
    }

    #[tokio::test]
    async fn test_body_is_ignored_for_get() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/categories/")
            .match_body(Matcher::Exact(String::new()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let (client, _store) = test_client(&server);
        let result: Option<Vec<Value>> = client
            .execute(
                Method::GET,
                "/api/categories/",
                Some(&json!({"should": "not be sent"})),
                false,
            )
            .await
            .unwrap();
        assert_eq!(result, Some(vec![]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_json_body_is_posted() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/cart/items")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"product_id": 5, "quantity": 2})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"id": 11, "cart_id": 1, "product_id": 5, "quantity": 2}).to_string(),
            )
            .create_async()
            .await;

        let (client, store) = test_client(&server);
        store.save("abc123").unwrap();

        cart::add_item(&client, 5, 2).await.unwrap();
        mock.assert_async().await;
    }

    // ── Login (form-encoded path) ────────────────────────────────────────

    #[tokio::test]
    async fn test_login_posts_form_and_stores_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login")
            .match_header(
                "content-type",
                Matcher::Regex("application/x-www-form-urlencoded".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".to_string(), "jane@example.com".to_string()),
                Matcher::UrlEncoded("password".to_string(), "secret".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"access_token": "abc123", "token_type": "bearer"}).to_string())
            .create_async()
            .await;

        let (client, store) = test_client(&server);
        let response = account::login(&client, "jane@example.com", "secret")
            .await
            .unwrap();

        assert_eq!(response.access_token, "abc123");
        assert_eq!(store.read(), Some("abc123".to_string()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_rejection_keeps_existing_token() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(json!({"detail": "Incorrect email or password"}).to_string())
            .create_async()
            .await;

        let (client, store) = test_client(&server);
        store.save("still-valid").unwrap();

        let err = account::login(&client, "jane@example.com", "wrong")
            .await
            .unwrap_err();
        match err {
            ApiError::Api { detail } => assert_eq!(detail, "Incorrect email or password"),
            other => panic!("expected Api error, got {:?}", other),
        }
        // A login rejection is not a session expiry.
        assert_eq!(store.read(), Some("still-valid".to_string()));
    }

    // ── Multipart upload ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_product_create_uploads_multipart_with_bearer() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/products/")
            .match_header("authorization", "Bearer tok-123")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".to_string()),
            )
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 31,
                    "name": "Rose Water",
                    "description": "Toner",
                    "price": 12.5,
                    "stock": 40,
                    "sku": "RW-01",
                    "category_id": 3,
                    "is_active": 1,
                    "created_at": "2024-01-01T00:00:00",
                    "updated_at": "2024-01-01T00:00:00",
                })
                .to_string(),
            )
            .create_async()
            .await;

        let (client, store) = test_client(&server);
        store.save("tok-123").unwrap();

        let new = catalog::NewProduct {
            name: "Rose Water".to_string(),
            description: Some("Toner".to_string()),
            price: 12.5,
            sku: Some("RW-01".to_string()),
            category_id: 3,
            stock: 40,
            image: None,
        };
        let product = catalog::create_product(&client, new).await.unwrap();

        assert_eq!(product.id, 31);
        assert_eq!(product.name, "Rose Water");
        mock.assert_async().await;
    }

    // ── Orders ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_checkout_posts_empty_body_and_parses_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/orders/")
            .match_header("authorization", "Bearer tok-123")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 8,
                    "user_id": 9,
                    "status": "pending",
                    "total_amount": 52.5,
                    "order_date": "2024-02-01T10:00:00",
                    "created_at": "2024-02-01T10:00:00",
                    "updated_at": "2024-02-01T10:00:00",
                    "items": [{
                        "id": 1,
                        "product_id": 5,
                        "quantity": 3,
                        "unit_price": 17.5,
                        "subtotal": 52.5,
                        "product": {"id": 5, "name": "Rose Water", "price": 17.5},
                    }],
                })
                .to_string(),
            )
            .create_async()
            .await;

        let (client, store) = test_client(&server);
        store.save("tok-123").unwrap();

        let order = orders::checkout(&client).await.unwrap();
        assert_eq!(order.id, 8);
        assert_eq!(order.status, "pending");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].subtotal, 52.5);
        mock.assert_async().await;
    }
}
