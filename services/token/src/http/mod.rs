//! HTTP boundary.
//!
//! | Route | Method | Result |
//! |---|---|---|
//! | `/v1/ping` | GET | 200 `OK` (other methods, HEAD included: 404) |
//! | `/v1/jwt` | POST | 200 with the compact token as body (other methods: 400) |

pub mod error;
pub mod handlers;
pub mod request;

pub use error::ApiError;

use crate::service::TokenService;
use axum::routing::{on, post, MethodFilter};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn router(service: TokenService) -> Router {
    Router::new()
        .route(
            "/v1/ping",
            on(MethodFilter::GET, handlers::ping).fallback(handlers::not_found),
        )
        .route(
            "/v1/jwt",
            post(handlers::retrieve_jwt).fallback(handlers::bad_request),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
