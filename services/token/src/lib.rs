//! Token issuer library.
//!
//! Authenticates a realm (credential + requested scope) and returns an
//! RS256-signed JWT in compact serialization. The pipeline is:
//! [`auth`] gate, then [`jwt`] claims, serializer and signer, exposed over
//! [`http`].

#![forbid(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod jwt;
pub mod service;

// Re-exports for convenience
pub use config::{Config, IssuerConfig};
pub use error::TokenError;
pub use service::TokenService;
