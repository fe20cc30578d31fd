//! Helpers shared by the integration test binaries.

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::signature::{UnparsedPublicKey, RSA_PKCS1_2048_8192_SHA256};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_utils::fixtures::{RSA_2048_PKCS1_PEM, SAMPLE_AUDIENCE, SAMPLE_ISSUER};
use token_issuer::auth::Authenticator;
use token_issuer::jwt::{JwtSigner, RsaSigner, SigningKey, TokenIssuer};
use token_issuer::{IssuerConfig, TokenError, TokenService};

pub fn signing_key() -> Arc<SigningKey> {
    Arc::new(SigningKey::from_pem_or_der(RSA_2048_PKCS1_PEM.as_bytes()).unwrap())
}

pub fn sample_config() -> IssuerConfig {
    IssuerConfig::new(SAMPLE_ISSUER, SAMPLE_AUDIENCE)
}

pub fn rsa_issuer(config: IssuerConfig, key: &Arc<SigningKey>) -> TokenIssuer {
    TokenIssuer::new(config, Arc::new(RsaSigner::new(Arc::clone(key))))
}

/// Counts calls and delegates to a real signer when one is given.
pub struct CountingSigner {
    inner: Option<RsaSigner>,
    calls: AtomicUsize,
}

impl CountingSigner {
    pub fn wrapping(key: &Arc<SigningKey>) -> Self {
        Self {
            inner: Some(RsaSigner::new(Arc::clone(key))),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails, like a faulting primitive.
    pub fn failing() -> Self {
        Self {
            inner: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl JwtSigner for CountingSigner {
    fn algorithm(&self) -> &'static str {
        "RS256"
    }

    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.inner {
            Some(signer) => signer.sign(signing_input),
            None => Err(TokenError::signing("injected fault")),
        }
    }
}

pub fn service_with(
    authenticator: Arc<dyn Authenticator>,
    config: IssuerConfig,
    signer: Arc<CountingSigner>,
) -> TokenService {
    TokenService::new(authenticator, TokenIssuer::new(config, signer))
}

/// Split a compact token into its three decoded segments.
pub fn decode_segments(token: &str) -> (serde_json::Value, serde_json::Value, Vec<u8>) {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "token must have three segments: {token}");

    let header = URL_SAFE_NO_PAD.decode(parts[0]).unwrap();
    let claims = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
    let signature = URL_SAFE_NO_PAD.decode(parts[2]).unwrap();

    (
        serde_json::from_slice(&header).unwrap(),
        serde_json::from_slice(&claims).unwrap(),
        signature,
    )
}

/// Verify the signature segment against the header and claims segments.
pub fn verify(token: &str, key: &SigningKey) -> bool {
    let Some((signing_input, signature)) = token.rsplit_once('.') else {
        return false;
    };
    let Ok(signature) = URL_SAFE_NO_PAD.decode(signature) else {
        return false;
    };
    UnparsedPublicKey::new(&RSA_PKCS1_2048_8192_SHA256, key.public_key_der())
        .verify(signing_input.as_bytes(), &signature)
        .is_ok()
}

pub fn is_base64url_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
