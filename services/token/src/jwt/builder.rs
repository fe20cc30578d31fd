use crate::auth::Scope;
use crate::config::IssuerConfig;
use crate::jwt::claims::ClaimSet;
use std::time::Duration;

pub struct ClaimSetBuilder {
    issuer: String,
    audience: String,
    subject: Option<String>,
    expires: Duration,
    scopes: Vec<String>,
    issued_at: Option<i64>,
}

impl ClaimSetBuilder {
    pub fn new(issuer: String, audience: String) -> Self {
        ClaimSetBuilder {
            issuer,
            audience,
            subject: None,
            expires: Duration::ZERO,
            scopes: Vec::new(),
            issued_at: None,
        }
    }

    pub fn from_config(config: &IssuerConfig) -> Self {
        let builder = Self::new(config.issuer.clone(), config.audience.clone()).expires(config.expires);
        match &config.subject {
            Some(subject) => builder.subject(subject.clone()),
            None => builder,
        }
    }

    /// An empty subject leaves both `sub` and `prn` unset.
    pub fn subject(mut self, subject: String) -> Self {
        self.subject = Some(subject).filter(|s| !s.is_empty());
        self
    }

    /// Zero means no `exp` claim.
    pub fn expires(mut self, expires: Duration) -> Self {
        self.expires = expires;
        self
    }

    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Pin the issuance time instead of reading the clock.
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.issued_at = Some(timestamp);
        self
    }

    pub fn build(self) -> ClaimSet {
        let iat = self
            .issued_at
            .unwrap_or_else(|| chrono::Utc::now().timestamp());

        let mut claims = ClaimSet::new(self.issuer, self.scopes.join(" "), self.audience, iat);

        if let Some(subject) = self.subject {
            claims = claims.with_subject(subject);
        }

        if !self.expires.is_zero() {
            // Round partial seconds up so a non-zero lifetime never yields exp == iat.
            let secs = self.expires.as_secs() + u64::from(self.expires.subsec_nanos() > 0);
            let ttl = i64::try_from(secs).unwrap_or(i64::MAX);
            claims = claims.with_expiry(iat.saturating_add(ttl));
        }

        claims
    }
}

/// Claims for a requested scope under the given issuer configuration,
/// issued at `issued_at` (unix seconds).
pub fn build_claims(config: &IssuerConfig, scope: &Scope, issued_at: i64) -> ClaimSet {
    ClaimSetBuilder::from_config(config)
        .scopes(scope.actions.clone())
        .issued_at(issued_at)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> IssuerConfig {
        IssuerConfig::new("svc@example.com", "https://auth.example.com/v1/jwt")
    }

    #[test]
    fn test_builder_basic() {
        let claims = ClaimSetBuilder::new("issuer".to_string(), "aud".to_string())
            .scopes(vec!["read".to_string(), "write".to_string()])
            .issued_at(1_000)
            .build();

        assert_eq!(claims.iss, "issuer");
        assert_eq!(claims.aud, "aud");
        assert_eq!(claims.scope, "read write");
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp, None);
        assert_eq!(claims.sub, None);
        assert_eq!(claims.prn, None);
    }

    #[test]
    fn test_empty_actions_give_empty_scope() {
        let claims = ClaimSetBuilder::new("i".into(), "a".into()).build();
        assert_eq!(claims.scope, "");
    }

    #[test]
    fn test_duplicate_actions_kept_in_order() {
        let actions = vec!["write".to_string(), "read".to_string(), "write".to_string()];
        let claims = ClaimSetBuilder::new("i".into(), "a".into()).scopes(actions).build();
        assert_eq!(claims.scope, "write read write");
    }

    #[test]
    fn test_subject_sets_legacy_field() {
        let claims = ClaimSetBuilder::from_config(&config().with_subject("alice@example.com"))
            .build();
        assert_eq!(claims.sub.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.prn, claims.sub);
    }

    #[test]
    fn test_empty_subject_is_unset() {
        let claims = ClaimSetBuilder::new("i".into(), "a".into())
            .subject(String::new())
            .build();
        assert_eq!(claims.sub, None);
        assert_eq!(claims.prn, None);
    }

    #[test]
    fn test_expiry_from_duration() {
        let claims = ClaimSetBuilder::from_config(&config().with_expires(Duration::from_secs(3600)))
            .issued_at(1_700_000_000)
            .build();
        assert_eq!(claims.exp, Some(1_700_003_600));
    }

    #[test]
    fn test_partial_seconds_round_up() {
        let claims = ClaimSetBuilder::new("i".into(), "a".into())
            .expires(Duration::from_millis(1))
            .issued_at(500)
            .build();
        assert_eq!(claims.exp, Some(501));

        let claims = ClaimSetBuilder::new("i".into(), "a".into())
            .expires(Duration::from_millis(2_500))
            .issued_at(500)
            .build();
        assert_eq!(claims.exp, Some(503));
    }

    #[test]
    fn test_zero_duration_means_no_expiry() {
        let claims = ClaimSetBuilder::from_config(&config().with_expires(Duration::ZERO)).build();
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_build_claims_from_scope() {
        let scope = Scope {
            resource: "r1".to_string(),
            actions: vec!["read".to_string()],
        };
        let claims = build_claims(&config().with_expires(Duration::from_secs(60)), &scope, 1_000);

        assert_eq!(claims.iss, "svc@example.com");
        assert_eq!(claims.aud, "https://auth.example.com/v1/jwt");
        assert_eq!(claims.scope, "read");
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp, Some(1_060));
    }
}
