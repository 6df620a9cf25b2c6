//! Auth and profile operations against the storefront backend.
//!
//! Login speaks the backend's OAuth2 password form (URL-encoded fields,
//! not JSON) and hands the returned access token to the credential store.
//! Logout is purely local: the backend has no logout endpoint.

use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{LoginResponse, PasswordChange, UserCreate, UserResponse, UserUpdate};

/// Log in and store the session token.
///
/// POST /api/auth/login with form fields `username`/`password` (the
/// backend authenticates by email but the form field is named `username`).
/// On success the `access_token` from the response is saved to the
/// credential store.
pub async fn login(
    client: &ApiClient,
    username: &str,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    let response: LoginResponse = client
        .post_form(
            "/api/auth/login",
            &[("username", username), ("password", password)],
        )
        .await?;
    log::debug!("Received {} token", response.token_type);

    client
        .store()
        .save(&response.access_token)
        .map_err(|e| ApiError::api(format!("Failed to store session token: {}", e)))?;

    Ok(response)
}

/// Create a new account. POST /api/auth/register.
pub async fn register(client: &ApiClient, user: &UserCreate) -> Result<UserResponse, ApiError> {
    client.post("/api/auth/register", user, false).await
}

/// Drop the local session. Clearing an absent token is a no-op.
pub fn logout(client: &ApiClient) {
    client.store().clear();
}

/// Fetch the logged-in user's profile. GET /api/users/me.
pub async fn profile(client: &ApiClient) -> Result<UserResponse, ApiError> {
    client.get("/api/users/me", true).await
}

/// Update profile fields. PUT /api/users/me.
pub async fn update_profile(
    client: &ApiClient,
    update: &UserUpdate,
) -> Result<UserResponse, ApiError> {
    client.put("/api/users/me", update, true).await
}

/// Change the account password. PUT /api/users/me/password.
pub async fn change_password(
    client: &ApiClient,
    change: &PasswordChange,
) -> Result<(), ApiError> {
    let _: Option<Value> = client
        .execute(Method::PUT, "/api/users/me/password", Some(change), true)
        .await?;
    Ok(())
}

/// Delete the account. DELETE /api/users/me answers 204.
pub async fn delete_account(client: &ApiClient) -> Result<(), ApiError> {
    client.delete("/api/users/me", true).await
}

/// Decode the payload of the stored JWT without verification.
///
/// The server validated the token at login; the payload is only used for
/// offline display of the current user (`sub` and `email` claims).
pub fn token_claims(token: &str) -> Result<Value, ApiError> {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(ApiError::api("Stored session token is not a valid JWT"));
    }

    let decoded = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|_| ApiError::api("Failed to decode session token payload"))?;

    serde_json::from_slice(&decoded)
        .map_err(|_| ApiError::api("Failed to parse session token payload"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(payload: &[u8]) -> String {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;

        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}");
        let payload = URL_SAFE_NO_PAD.encode(payload);
        format!("{}.{}.fake-signature", header, payload)
    }

    #[test]
    fn test_token_claims_extracts_sub_and_email() {
        let token = make_token(b"{\"sub\":42,\"email\":\"jane@example.com\",\"exp\":1700000000}");

        let claims = token_claims(&token).unwrap();
        assert_eq!(claims["sub"], 42);
        assert_eq!(claims["email"], "jane@example.com");
    }

    #[test]
    fn test_token_claims_rejects_malformed_token() {
        assert!(token_claims("not-a-jwt").is_err());
    }

    #[test]
    fn test_token_claims_rejects_bad_payload() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;

        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\"}");
        let token = format!("{}.%%%not-base64%%%.sig", header);
        assert!(token_claims(&token).is_err());
    }
}
