//! Shopping cart operations. Every cart endpoint requires a session.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::ApiClient;
use super::error::ApiError;

/// Product info embedded in cart items.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInfo {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: u32,
    pub is_active: i32,
}

/// One cart line with its product and line total.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub product: Option<ProductInfo>,
    #[serde(default)]
    pub item_total: Option<f64>,
}

/// Full cart from GET /api/cart/.
#[derive(Debug, Deserialize)]
pub struct CartDetail {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_amount: f64,
}

/// Lightweight totals from GET /api/cart/summary.
#[derive(Debug, Deserialize)]
pub struct CartSummary {
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_amount: f64,
}

#[derive(Debug, Serialize)]
struct CartItemCreate {
    product_id: i64,
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct CartItemUpdate {
    quantity: u32,
}

/// Fetch the cart with items and totals. GET /api/cart/.
pub async fn fetch(client: &ApiClient) -> Result<CartDetail, ApiError> {
    client.get("/api/cart/", true).await
}

/// Fetch cart totals only. GET /api/cart/summary.
pub async fn summary(client: &ApiClient) -> Result<CartSummary, ApiError> {
    client.get("/api/cart/summary", true).await
}

/// Add a product to the cart. POST /api/cart/items answers 201; the
/// created line is not needed by any caller and is discarded.
pub async fn add_item(client: &ApiClient, product_id: i64, quantity: u32) -> Result<(), ApiError> {
    let body = CartItemCreate {
        product_id,
        quantity,
    };
    let _: Option<Value> = client
        .execute(Method::POST, "/api/cart/items", Some(&body), true)
        .await?;
    Ok(())
}

/// Change the quantity of a cart line. PUT /api/cart/items/{item_id}.
pub async fn update_item(client: &ApiClient, item_id: i64, quantity: u32) -> Result<(), ApiError> {
    let body = CartItemUpdate { quantity };
    let _: Option<Value> = client
        .execute(
            Method::PUT,
            &format!("/api/cart/items/{}", item_id),
            Some(&body),
            true,
        )
        .await?;
    Ok(())
}

/// Remove a cart line. DELETE /api/cart/items/{item_id} answers 204.
pub async fn remove_item(client: &ApiClient, item_id: i64) -> Result<(), ApiError> {
    client
        .delete(&format!("/api/cart/items/{}", item_id), true)
        .await
}

/// Empty the cart. DELETE /api/cart/ answers 204.
pub async fn clear(client: &ApiClient) -> Result<(), ApiError> {
    client.delete("/api/cart/", true).await
}
