//! Lookup-backed authenticator over a configured credential table.

use super::{require_name, Authenticator, Identity, Realm};
use crate::error::TokenError;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use subtle::{Choice, ConstantTimeEq};
use tracing::debug;

const UNKNOWN_NAME_DIGEST: [u8; 32] = [0; 32];

/// One accepted principal.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialEntry {
    pub name: String,
    /// SHA-256 of the password. `None` accepts any password for this name.
    pub password_sha256: Option<[u8; 32]>,
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("name", &self.name)
            .field("password_checked", &self.password_sha256.is_some())
            .finish()
    }
}

impl CredentialEntry {
    /// Accept `name` with any password.
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password_sha256: None,
        }
    }

    pub fn with_password_digest(name: impl Into<String>, digest: [u8; 32]) -> Self {
        Self {
            name: name.into(),
            password_sha256: Some(digest),
        }
    }

    /// Convenience for tests and tooling: hash a plaintext password.
    pub fn with_password(name: impl Into<String>, password: &str) -> Self {
        Self::with_password_digest(name, Sha256::digest(password.as_bytes()).into())
    }
}

#[derive(Debug, Default)]
pub struct CredentialStore {
    entries: HashMap<String, Option<[u8; 32]>>,
}

impl CredentialStore {
    pub fn new(entries: impl IntoIterator<Item = CredentialEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.name, e.password_sha256))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn verify(&self, name: &str, password: &str) -> bool {
        let presented: [u8; 32] = Sha256::digest(password.as_bytes()).into();
        // Unknown names still run the comparison; `known` masks its result.
        let (expected, known) = match self.entries.get(name) {
            Some(None) => return true,
            Some(Some(expected)) => (expected, Choice::from(1)),
            None => (&UNKNOWN_NAME_DIGEST, Choice::from(0)),
        };
        (presented.ct_eq(expected) & known).into()
    }
}

#[async_trait]
impl Authenticator for CredentialStore {
    async fn authenticate(&self, realm: &Realm) -> Result<Identity, TokenError> {
        require_name(realm)?;

        let name = realm.credential.name.as_str();
        if self.verify(name, realm.credential.password.expose_secret()) {
            Ok(Identity {
                name: name.to_string(),
            })
        } else {
            debug!(name, "Credential rejected by store");
            Err(TokenError::authentication(format!("credential for '{name}' rejected")))
        }
    }
}
