//! Session token storage.
//!
//! The storefront session is a single opaque bearer token. The real binary
//! keeps it in the system keychain via the `keyring` crate so a login
//! survives restarts; tests and embedders can use the in-memory store.
//! Token presence is the sole "authenticated" signal used by the client.

use std::sync::Mutex;

use keyring::Entry;
use thiserror::Error;

/// Keychain service name for the GLAM CLI.
const SERVICE_NAME: &str = "com.glam.cli";

/// Keychain entry holding the current bearer token.
const TOKEN_KEY: &str = "access_token";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("keychain operation failed: {0}")]
    OperationFailed(String),
}

impl From<keyring::Error> for StoreError {
    fn from(err: keyring::Error) -> Self {
        StoreError::OperationFailed(err.to_string())
    }
}

/// Storage for the current session token.
///
/// At most one token is held at a time. Implementations are injected into
/// the API client so the session-expiry side effect stays testable.
pub trait TokenStore: Send + Sync {
    /// Store a token, overwriting any previous value. The token shape is
    /// not validated.
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// The current token, if any. Storage failures degrade to `None`.
    fn read(&self) -> Option<String>;

    /// Remove the token. Idempotent: clearing an empty store is a no-op.
    fn clear(&self);

    /// Whether a token is currently present. Derived from `read()` so it
    /// cannot diverge from the stored state.
    fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }
}

/// Token store backed by the system keychain.
pub struct KeyringStore;

impl KeyringStore {
    fn entry() -> Result<Entry, StoreError> {
        Ok(Entry::new(SERVICE_NAME, TOKEN_KEY)?)
    }
}

impl TokenStore for KeyringStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        Self::entry()?.set_password(token)?;
        Ok(())
    }

    fn read(&self) -> Option<String> {
        let entry = match Self::entry() {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to open keychain entry: {}", e);
                return None;
            }
        };
        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                log::warn!("Failed to read token from keychain: {}", e);
                None
            }
        }
    }

    fn clear(&self) {
        let Ok(entry) = Self::entry() else { return };
        match entry.delete_credential() {
            Ok(()) => {}
            Err(keyring::Error::NoEntry) => {} // Already cleared, idempotent
            Err(e) => log::warn!("Failed to clear token from keychain: {}", e),
        }
    }
}

/// In-memory token store for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| StoreError::OperationFailed("store lock poisoned".to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn read(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_read_round_trips() {
        let store = MemoryStore::new();
        store.save("abc123").unwrap();
        assert_eq!(store.read(), Some("abc123".to_string()));
    }

    #[test]
    fn test_save_overwrites_previous_token() {
        let store = MemoryStore::new();
        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.read(), Some("second".to_string()));
    }

    #[test]
    fn test_clear_removes_token() {
        let store = MemoryStore::new();
        store.save("abc123").unwrap();
        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_clear_on_empty_store_is_noop() {
        let store = MemoryStore::new();
        store.clear();
        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_is_authenticated_follows_presence() {
        let store = MemoryStore::new();
        assert!(!store.is_authenticated());
        store.save("abc123").unwrap();
        assert!(store.is_authenticated());
        store.clear();
        assert!(!store.is_authenticated());
    }
}
