//! Auth and profile types for the storefront backend API.
//!
//! The backend serializes snake_case JSON, which matches serde's default
//! field naming. Timestamps arrive as ISO-8601 strings and are kept as
//! strings -- the client only displays them.

use serde::{Deserialize, Serialize};

/// Login response from POST /api/auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Registration request body for POST /api/auth/register.
#[derive(Debug, Serialize)]
pub struct UserCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: String,
}

/// Partial profile update for PUT /api/users/me. Absent fields are left
/// unchanged by the backend.
#[derive(Debug, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Password change request for PUT /api/users/me/password.
#[derive(Debug, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

/// User profile as returned by the backend. Unknown response fields are
/// ignored; only what the client displays is modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
}
