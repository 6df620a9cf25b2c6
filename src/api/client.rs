//! HTTP client with auth header injection for the storefront API.
//!
//! One executor serves every call site: it resolves endpoint paths against
//! the configured base URL, attaches the stored bearer token on request,
//! and classifies responses. A 401 clears the credential store before the
//! failure is surfaced; error bodies yield their `detail` message.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, multipart, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::{ApiError, UNKNOWN_ERROR_DETAIL};
use super::store::TokenStore;

/// HTTP client wrapper for storefront API communication.
///
/// Holds the backend base URL, the underlying reqwest client, and the
/// injected credential store consulted on every authenticated request.
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: &str, store: Arc<dyn TokenStore>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// The injected credential store.
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Whether a session token is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Perform one API call and classify the outcome.
    ///
    /// `body` is serialized as JSON and ignored for GET requests. With
    /// `requires_auth`, the stored bearer token is attached when present;
    /// when no token is stored the request still goes out unauthenticated
    /// and the server is left to reject it.
    ///
    /// Returns `Ok(None)` for 204 responses and successes without a JSON
    /// body.
    pub async fn execute<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        requires_auth: bool,
    ) -> Result<Option<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if requires_auth {
            if let Some(token) = self.store.read() {
                builder = builder.bearer_auth(token);
            }
        }

        if let Some(value) = body {
            if method != Method::GET {
                builder = builder.json(value);
            }
        }

        let response = builder.send().await?;
        self.classify(response).await
    }

    /// GET a JSON payload.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        self.execute::<(), T>(Method::GET, endpoint, None, requires_auth)
            .await?
            .ok_or_else(ApiError::empty_body)
    }

    /// POST a JSON body and parse the JSON response.
    pub async fn post<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        requires_auth: bool,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, endpoint, Some(body), requires_auth)
            .await?
            .ok_or_else(ApiError::empty_body)
    }

    /// PUT a JSON body and parse the JSON response.
    pub async fn put<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        requires_auth: bool,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PUT, endpoint, Some(body), requires_auth)
            .await?
            .ok_or_else(ApiError::empty_body)
    }

    /// DELETE, expecting no payload back (the backend answers 204).
    pub async fn delete(&self, endpoint: &str, requires_auth: bool) -> Result<(), ApiError> {
        self.execute::<(), Value>(Method::DELETE, endpoint, None, requires_auth)
            .await?;
        Ok(())
    }

    /// POST URL-encoded form fields without attaching credentials.
    ///
    /// The auth endpoint expects `application/x-www-form-urlencoded` input
    /// rather than JSON, and a 401 here means rejected credentials rather
    /// than an expired session, so the response deliberately bypasses the
    /// session classification: any error body surfaces as `Api` with its
    /// detail and the stored token is left alone.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.post(&url).form(fields).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_body(response).await);
        }
        response.json::<T>().await.map_err(ApiError::from)
    }

    /// POST a multipart form, attaching the bearer token when present.
    ///
    /// No content-type header is set explicitly: the transport supplies the
    /// multipart boundary. The response is classified like any other call.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: multipart::Form,
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut builder = self.client.post(&url).multipart(form);
        if let Some(token) = self.store.read() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        self.classify(response).await
    }

    /// Normalize a response into a parsed payload, an empty success, or a
    /// typed error. A 401 clears the credential store before failing.
    async fn classify<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<Option<T>, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            log::info!("Received 401, clearing stored session");
            self.store.clear();
            return Err(ApiError::SessionExpired);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("application/json"))
            .unwrap_or(false);

        if status.is_success() {
            if is_json {
                return Ok(Some(response.json::<T>().await?));
            }
            return Ok(None);
        }

        Err(Self::error_from_body(response).await)
    }

    /// Extract the backend's `detail` message from an error response body,
    /// falling back to a generic message when the body is not JSON.
    async fn error_from_body(response: Response) -> ApiError {
        let detail = match response.json::<Value>().await {
            Ok(body) => match body.get("detail") {
                Some(Value::String(detail)) => detail.clone(),
                // Validation errors arrive as structured detail; show them raw.
                Some(other) => other.to_string(),
                None => UNKNOWN_ERROR_DETAIL.to_string(),
            },
            Err(_) => UNKNOWN_ERROR_DETAIL.to_string(),
        };
        ApiError::Api { detail }
    }
}
