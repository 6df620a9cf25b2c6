//! Order operations. Every order endpoint requires a session.
//!
//! Orders are created from the current cart: checkout posts no body and
//! the backend moves the cart lines into a new order.

use reqwest::Method;
use serde::Deserialize;

use super::client::ApiClient;
use super::error::ApiError;

/// Product info embedded in order items.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderProduct {
    pub id: i64,
    pub name: String,
}

/// One order line, priced at order time.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
    #[serde(default)]
    pub product: Option<OrderProduct>,
}

/// Order as returned by the backend.
#[derive(Debug, Deserialize)]
pub struct Order {
    pub id: i64,
    pub status: String,
    pub total_amount: f64,
    pub order_date: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// List the user's orders. GET /api/orders/.
pub async fn list(client: &ApiClient) -> Result<Vec<Order>, ApiError> {
    client.get("/api/orders/", true).await
}

/// Fetch one order. GET /api/orders/{id}.
pub async fn fetch(client: &ApiClient, id: i64) -> Result<Order, ApiError> {
    client.get(&format!("/api/orders/{}", id), true).await
}

/// Create an order from the current cart. POST /api/orders/ takes no body
/// and answers 201 with the new order.
pub async fn checkout(client: &ApiClient) -> Result<Order, ApiError> {
    client
        .execute::<(), Order>(Method::POST, "/api/orders/", None, true)
        .await?
        .ok_or_else(ApiError::empty_body)
}

/// Cancel an order. PUT /api/orders/{id}/cancel returns the updated order.
pub async fn cancel(client: &ApiClient, id: i64) -> Result<Order, ApiError> {
    client
        .execute::<(), Order>(Method::PUT, &format!("/api/orders/{}/cancel", id), None, true)
        .await?
        .ok_or_else(ApiError::empty_body)
}
