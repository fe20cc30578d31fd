//! JWS compact serialization.

use crate::error::TokenError;
use crate::jwt::claims::{ClaimSet, Header};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

pub struct CompactSerializer;

impl CompactSerializer {
    /// `b64url(header) "." b64url(claims)`, the bytes the signature covers.
    ///
    /// # Errors
    ///
    /// [`TokenError::Encoding`] if either document fails to serialize.
    pub fn signing_input(header: &Header, claims: &ClaimSet) -> Result<String, TokenError> {
        let header_json = serde_json::to_vec(header)?;
        let claims_json = serde_json::to_vec(claims)?;

        let mut input = URL_SAFE_NO_PAD.encode(header_json);
        input.push('.');
        URL_SAFE_NO_PAD.encode_string(claims_json, &mut input);
        Ok(input)
    }

    /// Appends the encoded signature as the third segment.
    pub fn assemble(signing_input: String, signature: &[u8]) -> String {
        let mut token = signing_input;
        token.push('.');
        URL_SAFE_NO_PAD.encode_string(signature, &mut token);
        token
    }

    /// Decode the claims segment of a compact token without checking its
    /// signature. For diagnostics and tests only.
    ///
    /// # Errors
    ///
    /// [`TokenError::Encoding`] if the token is not three segments of
    /// base64url JSON.
    pub fn peek_claims(token: &str) -> Result<ClaimSet, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(TokenError::encoding("Invalid token format"));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|e| TokenError::encoding(e.to_string()))?;

        Ok(serde_json::from_slice(&payload)?)
    }
}
