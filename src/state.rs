//! Application state for the GLAM CLI.
//!
//! Shared state holding the API client and the injected presentation
//! collaborators. The `ApiClient` is shared via `Arc` so command handlers
//! can issue concurrent calls.

use std::sync::Arc;

use crate::api::client::ApiClient;
use crate::ui::{Navigator, Notifier};

/// State shared across command handlers.
pub struct AppState {
    /// HTTP client for storefront API communication.
    pub api: Arc<ApiClient>,

    /// Transient notice sink (the web client's toast).
    pub notifier: Box<dyn Notifier>,

    /// Login-entry navigation trigger, invoked after logout or expiry.
    pub navigator: Box<dyn Navigator>,
}

impl AppState {
    /// Create a new AppState around the given client and collaborators.
    pub fn new(
        api: ApiClient,
        notifier: Box<dyn Notifier>,
        navigator: Box<dyn Navigator>,
    ) -> Self {
        Self {
            api: Arc::new(api),
            notifier,
            navigator,
        }
    }
}
