use super::error::ApiError;
use super::request::{check_for_json, validate_form};
use crate::auth::decode_realm;
use crate::service::TokenService;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};

/// Liveness probe.
pub async fn ping() -> &'static str {
    "OK"
}

/// `POST /v1/jwt`: form, content type, decode, authenticate, issue.
pub async fn retrieve_jwt(
    State(service): State<TokenService>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<String, ApiError> {
    validate_form(query.as_deref())?;
    check_for_json(&headers, &body).map_err(ApiError::content_type)?;

    let realm = decode_realm(&body)?;
    Ok(service.retrieve(realm).await?)
}

pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub async fn bad_request() -> StatusCode {
    StatusCode::BAD_REQUEST
}
