//! Authenticate-then-issue, the operation behind `POST /v1/jwt`.

use crate::auth::{Authenticator, Realm};
use crate::error::TokenError;
use crate::jwt::TokenIssuer;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct TokenService {
    authenticator: Arc<dyn Authenticator>,
    issuer: TokenIssuer,
}

impl TokenService {
    pub fn new(authenticator: Arc<dyn Authenticator>, issuer: TokenIssuer) -> Self {
        Self {
            authenticator,
            issuer,
        }
    }

    /// Authenticate `realm` and, only if accepted, issue a token for its scope.
    ///
    /// # Errors
    ///
    /// [`TokenError::Authentication`] before any key material is touched, or
    /// whatever the issuer reports.
    pub async fn retrieve(&self, realm: Realm) -> Result<String, TokenError> {
        let identity = self
            .authenticator
            .authenticate(&realm)
            .await
            .inspect_err(|e| debug!(error = %e, "Authentication rejected"))?;

        let token = self.issuer.issue(&realm.scope)?;

        info!(
            principal = %identity.name,
            resource = %realm.scope.resource,
            actions = realm.scope.actions.len(),
            "Token issued"
        );
        Ok(token)
    }
}
