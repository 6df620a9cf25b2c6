//! Product and category operations.
//!
//! Listing is public; product management requires a session. Product
//! creation goes out as multipart form data because the backend takes the
//! optional image file alongside the product fields.

use std::path::PathBuf;

use reqwest::multipart;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::error::ApiError;

/// Product as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
    pub sku: Option<String>,
    pub category_id: Option<i64>,
    pub is_active: i32,
    pub created_at: String,
}

/// Category as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Partial product update for PUT /api/products/{id}.
#[derive(Debug, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<i32>,
}

/// Fields for creating a product. Sent as multipart form data, with the
/// optional image as a file part.
#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sku: Option<String>,
    pub category_id: i64,
    pub stock: u32,
    pub image: Option<PathBuf>,
}

/// Filters for the product listing. Absent fields are omitted from the
/// query string.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilter {
    /// Build the query string, URL-encoding user-supplied values.
    fn to_query(&self) -> String {
        let mut params = Vec::new();
        if let Some(category_id) = self.category_id {
            params.push(format!("category_id={}", category_id));
        }
        if let Some(ref search) = self.search {
            params.push(format!("search={}", urlencoding::encode(search)));
        }
        if let Some(min_price) = self.min_price {
            params.push(format!("min_price={}", min_price));
        }
        if let Some(max_price) = self.max_price {
            params.push(format!("max_price={}", max_price));
        }
        params.join("&")
    }
}

/// List products. GET /api/products/ with optional filters.
pub async fn list_products(
    client: &ApiClient,
    filter: &ProductFilter,
) -> Result<Vec<Product>, ApiError> {
    let query = filter.to_query();
    let path = if query.is_empty() {
        "/api/products/".to_string()
    } else {
        format!("/api/products/?{}", query)
    };
    client.get(&path, false).await
}

/// Fetch one product. GET /api/products/{id}.
pub async fn get_product(client: &ApiClient, id: i64) -> Result<Product, ApiError> {
    client.get(&format!("/api/products/{}", id), false).await
}

/// Create a product. POST /api/products/ as multipart form data.
pub async fn create_product(client: &ApiClient, new: NewProduct) -> Result<Product, ApiError> {
    let mut form = multipart::Form::new()
        .text("name", new.name)
        .text("description", new.description.unwrap_or_default())
        .text("price", new.price.to_string())
        .text("category_id", new.category_id.to_string())
        .text("stock", new.stock.to_string());

    if let Some(sku) = new.sku {
        form = form.text("sku", sku);
    }

    if let Some(path) = new.image {
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            ApiError::api(format!("Failed to read image {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        form = form.part("image", multipart::Part::bytes(bytes).file_name(file_name));
    }

    client
        .upload("/api/products/", form)
        .await?
        .ok_or_else(ApiError::empty_body)
}

/// Update a product. PUT /api/products/{id}.
pub async fn update_product(
    client: &ApiClient,
    id: i64,
    update: &ProductUpdate,
) -> Result<Product, ApiError> {
    client
        .put(&format!("/api/products/{}", id), update, true)
        .await
}

/// Delete a product. DELETE /api/products/{id} answers 204.
pub async fn delete_product(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/api/products/{}", id), true).await
}

/// List categories. GET /api/categories/.
pub async fn list_categories(client: &ApiClient) -> Result<Vec<Category>, ApiError> {
    client.get("/api/categories/", false).await
}

/// Fetch one category. GET /api/categories/{id}.
pub async fn get_category(client: &ApiClient, id: i64) -> Result<Category, ApiError> {
    client.get(&format!("/api/categories/{}", id), false).await
}
