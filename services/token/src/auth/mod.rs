//! Authentication gate.
//!
//! The issuance path only runs after an [`Authenticator`] accepts the realm.
//! Implementations are chosen at startup and injected as `Arc<dyn Authenticator>`.

pub mod realm;
pub mod store;

pub use realm::{decode_realm, Credential, Realm, Scope};
pub use store::{CredentialEntry, CredentialStore};

use crate::error::TokenError;
use async_trait::async_trait;

/// An authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
}

/// Decides whether a presented credential is valid.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Accept or reject `realm`. Implementations must reject a realm with an
    /// empty credential name without consulting any backing store.
    ///
    /// # Errors
    ///
    /// [`TokenError::Authentication`] on rejection.
    async fn authenticate(&self, realm: &Realm) -> Result<Identity, TokenError>;
}

/// Fixed verdict, for development and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAuthenticator {
    accept: bool,
}

impl StaticAuthenticator {
    /// Accepts any realm with a non-empty name.
    pub const fn allow_all() -> Self {
        Self { accept: true }
    }

    /// Rejects everything.
    pub const fn deny_all() -> Self {
        Self { accept: false }
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, realm: &Realm) -> Result<Identity, TokenError> {
        require_name(realm)?;
        if self.accept {
            Ok(Identity {
                name: realm.credential.name.clone(),
            })
        } else {
            Err(TokenError::authentication("all credentials are rejected"))
        }
    }
}

/// Shared precondition: an anonymous realm is always rejected.
pub(crate) fn require_name(realm: &Realm) -> Result<(), TokenError> {
    if realm.credential.name.is_empty() {
        return Err(TokenError::authentication("credential name is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn realm(name: &str, password: &str) -> Realm {
        Realm::new(Credential::new(name, password), Scope::default())
    }

    #[tokio::test]
    async fn test_allow_all_accepts_named_realm() {
        let identity = StaticAuthenticator::allow_all()
            .authenticate(&realm("anyone", ""))
            .await
            .unwrap();
        assert_eq!(identity.name, "anyone");
    }

    #[tokio::test]
    async fn test_allow_all_rejects_empty_realm() {
        let err = StaticAuthenticator::allow_all()
            .authenticate(&Realm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_deny_all() {
        let err = StaticAuthenticator::deny_all()
            .authenticate(&realm("hukp", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Authentication(_)));
    }
}
