//! Token issuance: claims, serialization and signing composed into one call.

use crate::auth::Scope;
use crate::config::IssuerConfig;
use crate::error::TokenError;
use crate::jwt::builder::build_claims;
use crate::jwt::claims::Header;
use crate::jwt::serializer::CompactSerializer;
use crate::jwt::signer::JwtSigner;
use std::sync::Arc;
use tracing::{debug, error};

/// Issues compact RS256 tokens. Cheap to clone; safe to share across tasks.
#[derive(Clone)]
pub struct TokenIssuer {
    config: Arc<IssuerConfig>,
    signer: Arc<dyn JwtSigner>,
    header: Header,
}

impl TokenIssuer {
    pub fn new(config: IssuerConfig, signer: Arc<dyn JwtSigner>) -> Self {
        TokenIssuer {
            config: Arc::new(config),
            signer,
            header: Header::RS256,
        }
    }

    /// Issue a token for `scope`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// [`TokenError::Encoding`] or [`TokenError::Signing`]; nothing is retried.
    pub fn issue(&self, scope: &Scope) -> Result<String, TokenError> {
        self.issue_at(scope, chrono::Utc::now().timestamp())
    }

    /// Issue a token with a fixed issuance time.
    ///
    /// # Errors
    ///
    /// See [`TokenIssuer::issue`].
    pub fn issue_at(&self, scope: &Scope, now: i64) -> Result<String, TokenError> {
        if self.signer.algorithm() != self.header.alg {
            return Err(TokenError::signing(format!(
                "signer implements {}, header declares {}",
                self.signer.algorithm(),
                self.header.alg
            )));
        }

        let claims = build_claims(&self.config, scope, now);

        let signing_input = CompactSerializer::signing_input(&self.header, &claims)?;

        let signature = self
            .signer
            .sign(signing_input.as_bytes())
            .inspect_err(|e| error!(code = e.code(), "Token signing failed"))?;

        debug!(
            iss = %claims.iss,
            scope = %claims.scope,
            exp = ?claims.exp,
            "Token signed"
        );

        Ok(CompactSerializer::assemble(signing_input, &signature))
    }
}
