use crate::error::TokenError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

const BAD_REQUEST_BODY: &str = "Bad Request.";
const CONTENT_TYPE_BODY: &str = "Content-Type specified must be 'application/json'";

/// A [`TokenError`] on its way out of the HTTP boundary.
#[derive(Debug)]
pub struct ApiError {
    error: TokenError,
    body: &'static str,
}

impl ApiError {
    /// Content-Type rejections get their own explanatory body.
    pub fn content_type(error: TokenError) -> Self {
        Self {
            error,
            body: CONTENT_TYPE_BODY,
        }
    }

    pub fn status(&self) -> StatusCode {
        if self.error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        let body = if error.is_client_error() { BAD_REQUEST_BODY } else { "" };
        Self { error, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // Details stay in the log; the caller only learns it was our fault.
            error!(code = self.error.code(), error = %self.error, "Token request failed");
        } else {
            debug!(code = self.error.code(), error = %self.error, "Token request rejected");
        }
        (status, self.body).into_response()
    }
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
