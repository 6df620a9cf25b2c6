//! Error taxonomy for storefront API calls.
//!
//! Every failure raised by the request pipeline is one of three kinds:
//! a transport-level failure, an expired session, or a backend-reported
//! error carrying its `detail` message. Nothing is swallowed or retried.

use thiserror::Error;

/// Detail used when an error response body cannot be parsed as JSON.
pub const UNKNOWN_ERROR_DETAIL: &str = "Unknown error. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed at the network layer.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered 401. The credential store has already been
    /// cleared when this is raised.
    #[error("session expired")]
    SessionExpired,

    /// Any other non-success status, with the backend's `detail` message.
    #[error("{detail}")]
    Api { detail: String },
}

impl ApiError {
    /// Build an `Api` error from a detail message.
    pub fn api(detail: impl Into<String>) -> Self {
        ApiError::Api {
            detail: detail.into(),
        }
    }

    /// Error for endpoints that promised a payload but sent none.
    pub(crate) fn empty_body() -> Self {
        ApiError::api("Empty response from server")
    }
}
