//! Request-shape checks that run before a realm is decoded.

use crate::error::TokenError;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use mime::Mime;
use tracing::error;

/// Reject query strings a standard form parser would refuse: bad percent
/// escapes and `;` separators.
///
/// # Errors
///
/// [`TokenError::MalformedRequest`] describing the first problem found.
pub fn validate_form(query: Option<&str>) -> Result<(), TokenError> {
    let Some(query) = query else {
        return Ok(());
    };

    let bytes = query.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b';' => return Err(TokenError::malformed("invalid semicolon separator in query")),
            b'%' => {
                let escape = bytes.get(i + 1..i + 3);
                if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                    return Err(TokenError::malformed(format!(
                        "invalid URL escape at offset {i}"
                    )));
                }
                i += 3;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    Ok(())
}

/// The body must be declared JSON, except that an empty body may come
/// without any Content-Type.
///
/// # Errors
///
/// [`TokenError::MalformedRequest`] when the declared type is missing,
/// unparsable, or not `application/json`.
pub fn check_for_json(headers: &HeaderMap, body: &[u8]) -> Result<(), TokenError> {
    let content_type = match headers.get(CONTENT_TYPE) {
        None => "",
        Some(value) => value
            .to_str()
            .map_err(|_| TokenError::malformed("Content-Type is not valid ASCII"))?,
    };

    if content_type.is_empty() && body.is_empty() {
        return Ok(());
    }

    if matches_content_type(content_type, &mime::APPLICATION_JSON) {
        return Ok(());
    }

    Err(TokenError::malformed(format!(
        "Content-Type specified ({content_type}) must be '{}'",
        mime::APPLICATION_JSON
    )))
}

/// Compare the media type of `content_type` against `expected`, ignoring
/// parameters and case.
pub fn matches_content_type(content_type: &str, expected: &Mime) -> bool {
    match content_type.trim().parse::<Mime>() {
        Ok(media_type) => media_type.essence_str() == expected.essence_str(),
        Err(e) => {
            error!(content_type, error = %e, "Error parsing media type");
            false
        }
    }
}
