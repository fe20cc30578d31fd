//! Shared test utilities for auth-platform Rust services.
//!
//! This crate provides:
//! - Proptest generators for realm, scope and issuer values
//! - Test fixtures: key material and sample request bodies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use generators::*;
