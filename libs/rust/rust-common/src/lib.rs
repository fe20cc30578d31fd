//! Shared library for cross-cutting concerns in auth-platform Rust services.
//!
//! This crate provides centralized implementations for:
//! - Tracing subscriber initialization (plain or JSON output)
//! - Graceful shutdown on SIGINT/SIGTERM with a bounded drain period

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod shutdown;
pub mod tracing_config;

pub use shutdown::{run_with_graceful_shutdown, ShutdownCoordinator, ShutdownSignal};
pub use tracing_config::{init_tracing, TracingConfig, TracingInitError};
