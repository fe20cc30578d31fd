//! Error kinds surfaced by the issuance pipeline and its HTTP boundary.
//!
//! Messages are sanitized: no variant ever carries key bytes, passwords or
//! issued tokens.

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Key bytes are empty or not a decodable PEM/DER block
    #[error("Key format error: {0}")]
    KeyFormat(String),

    /// Key decodes but is not an RSA private key usable for RS256
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Header or claim set could not be serialized
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The signing primitive failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// The authentication gate rejected the credential
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Bad form, content type or JSON at the HTTP boundary
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl TokenError {
    pub fn key_format(msg: impl Into<String>) -> Self {
        Self::KeyFormat(msg.into())
    }

    pub fn unsupported_key_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedKeyType(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    /// True when the caller sent something wrong; false when the service
    /// itself is misconfigured or faulted.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Authentication(_) | Self::MalformedRequest(_))
    }

    /// Stable machine-readable code, safe to log.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::KeyFormat(_) => TOKEN_KEY_FORMAT,
            Self::UnsupportedKeyType(_) => TOKEN_UNSUPPORTED_KEY_TYPE,
            Self::Encoding(_) => TOKEN_ENCODING,
            Self::Signing(_) => TOKEN_SIGNING,
            Self::Authentication(_) => TOKEN_AUTHENTICATION,
            Self::MalformedRequest(_) => TOKEN_MALFORMED_REQUEST,
        }
    }
}

impl From<serde_json::Error> for TokenError {
    fn from(err: serde_json::Error) -> Self {
        TokenError::Encoding(err.to_string())
    }
}

// Error codes for logs and responses
pub const TOKEN_KEY_FORMAT: &str = "TOKEN_KEY_FORMAT";
pub const TOKEN_UNSUPPORTED_KEY_TYPE: &str = "TOKEN_UNSUPPORTED_KEY_TYPE";
pub const TOKEN_ENCODING: &str = "TOKEN_ENCODING";
pub const TOKEN_SIGNING: &str = "TOKEN_SIGNING";
pub const TOKEN_AUTHENTICATION: &str = "TOKEN_AUTHENTICATION";
pub const TOKEN_MALFORMED_REQUEST: &str = "TOKEN_MALFORMED_REQUEST";
