//! JWT signing seam and the RS256 implementation.

use crate::error::TokenError;
use crate::jwt::key::SigningKey;
use ring::rand::SystemRandom;
use ring::signature::RSA_PKCS1_SHA256;
use std::sync::Arc;

/// Produces the signature segment over a signing input.
pub trait JwtSigner: Send + Sync {
    /// JOSE `alg` this signer implements.
    fn algorithm(&self) -> &'static str;

    /// Sign `signing_input`, returning raw signature bytes.
    ///
    /// # Errors
    ///
    /// [`TokenError::Signing`] if the primitive fails.
    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, TokenError>;
}

/// RSASSA-PKCS1-v1_5 over SHA-256.
pub struct RsaSigner {
    key: Arc<SigningKey>,
    rng: SystemRandom,
}

impl RsaSigner {
    #[must_use]
    pub fn new(key: Arc<SigningKey>) -> Self {
        Self {
            key,
            rng: SystemRandom::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &SigningKey {
        &self.key
    }
}

impl JwtSigner for RsaSigner {
    fn algorithm(&self) -> &'static str {
        "RS256"
    }

    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut signature = vec![0u8; self.key.signature_len()];
        self.key
            .key_pair()
            .sign(&RSA_PKCS1_SHA256, &self.rng, signing_input, &mut signature)
            .map_err(|_| TokenError::signing("RSA PKCS#1 v1.5 signing failed"))?;
        Ok(signature)
    }
}
