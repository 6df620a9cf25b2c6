//! API client module for the GLAM storefront.
//!
//! Provides the HTTP request executor with auth header injection, keychain
//! token storage, typed endpoint operations (auth, catalog, cart, orders),
//! and request/response types matching the storefront backend API.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod client;
pub mod error;
pub mod orders;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;
