//! RSA signing key material.
//!
//! Accepts PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) keys, PEM
//! armored or raw DER. Parsed once at startup and shared read-only.

use crate::error::TokenError;
use ring::signature::{KeyPair, RsaKeyPair};
use std::fmt;

const PEM_ARMOR: &[u8] = b"-----BEGIN ";

const TAG_PKCS1: &str = "RSA PRIVATE KEY";
const TAG_PKCS8: &str = "PRIVATE KEY";

/// Parsed RSA private key. Immutable once constructed.
pub struct SigningKey {
    key_pair: RsaKeyPair,
}

impl SigningKey {
    /// Parse key bytes.
    ///
    /// # Errors
    ///
    /// [`TokenError::KeyFormat`] for empty or undecodable input,
    /// [`TokenError::UnsupportedKeyType`] for a decodable key that is not an
    /// RSA key of acceptable size.
    pub fn from_pem_or_der(bytes: &[u8]) -> Result<Self, TokenError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(TokenError::key_format("empty key material"));
        }

        if !contains_armor(bytes) {
            return Self::from_der(bytes);
        }

        let block = pem::parse(bytes)
            .map_err(|e| TokenError::key_format(format!("invalid PEM block: {e}")))?;

        match block.tag() {
            TAG_PKCS8 => Self::from_der(block.contents()),
            TAG_PKCS1 => RsaKeyPair::from_der(block.contents())
                .map(|key_pair| Self { key_pair })
                .map_err(|e| classify(&e.to_string())),
            other => Err(TokenError::unsupported_key_type(format!(
                "PEM block '{other}' is not an RSA private key"
            ))),
        }
    }

    /// DER input: PKCS#8 first, then PKCS#1.
    fn from_der(der: &[u8]) -> Result<Self, TokenError> {
        match RsaKeyPair::from_pkcs8(der) {
            Ok(key_pair) => Ok(Self { key_pair }),
            Err(pkcs8_err) => match RsaKeyPair::from_der(der) {
                Ok(key_pair) => Ok(Self { key_pair }),
                // A well-formed PKCS#8 wrapper around another algorithm is
                // more telling than the PKCS#1 retry failing to parse it.
                Err(pkcs1_err) => {
                    let pkcs8_reason = pkcs8_err.to_string();
                    if is_unsupported(&pkcs8_reason) {
                        Err(classify(&pkcs8_reason))
                    } else {
                        Err(classify(&pkcs1_err.to_string()))
                    }
                }
            },
        }
    }

    /// PKCS#1 `RSAPublicKey` DER of the public half.
    #[must_use]
    pub fn public_key_der(&self) -> &[u8] {
        self.key_pair.public_key().as_ref()
    }

    /// Modulus size in bits.
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.key_pair.public_key().modulus_len() * 8
    }

    /// Signature length in bytes.
    #[must_use]
    pub fn signature_len(&self) -> usize {
        self.key_pair.public_key().modulus_len()
    }

    pub(crate) fn key_pair(&self) -> &RsaKeyPair {
        &self.key_pair
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

/// Free-function form of [`SigningKey::from_pem_or_der`].
///
/// # Errors
///
/// See [`SigningKey::from_pem_or_der`].
pub fn parse_key(bytes: &[u8]) -> Result<SigningKey, TokenError> {
    SigningKey::from_pem_or_der(bytes)
}

fn contains_armor(bytes: &[u8]) -> bool {
    bytes.windows(PEM_ARMOR.len()).any(|w| w == PEM_ARMOR)
}

/// ring rejection reasons for a key that decoded fine but cannot sign RS256.
fn is_unsupported(reason: &str) -> bool {
    matches!(
        reason,
        "WrongAlgorithm"
            | "TooSmall"
            | "TooLarge"
            | "PrivateModulusLenNotMultipleOf512Bits"
            | "VersionNotSupported"
    )
}

fn classify(reason: &str) -> TokenError {
    if is_unsupported(reason) {
        TokenError::unsupported_key_type(format!("key rejected: {reason}"))
    } else {
        TokenError::key_format(format!("key rejected: {reason}"))
    }
}
