//! Centralized configuration for the token issuer.
//!
//! Loaded once from environment variables (and an optional `.env` file) by
//! the startup path, validated, then handed out by value. Nothing mutates it
//! afterwards.

use crate::auth::CredentialEntry;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing required field
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// Environment variable parse error
    #[error("Failed to parse environment variable {name}: {reason}")]
    ParseError {
        /// Variable name
        name: String,
        /// Parser message
        reason: String,
    },

    /// Value parsed but is not acceptable
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue {
        /// Variable name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Private key file could not be read
    #[error("Cannot read private key file {path}: {reason}")]
    KeyFile {
        /// Path as configured
        path: String,
        /// I/O message
        reason: String,
    },
}

/// Which [`Authenticator`](crate::auth::Authenticator) the service runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Configured credential table
    Static,
    /// Accept every named realm (development only)
    AllowAll,
    /// Reject everything
    DenyAll,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "allow-all" => Ok(Self::AllowAll),
            "deny-all" => Ok(Self::DenyAll),
            other => Err(format!("unknown auth mode '{other}'")),
        }
    }
}

/// Where the signing key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// PEM text given directly
    Inline(String),
    /// PEM or DER file on disk
    File(PathBuf),
}

impl KeySource {
    /// Read the raw key bytes. Parsing is the caller's job.
    ///
    /// # Errors
    ///
    /// [`ConfigError::KeyFile`] if the file cannot be read.
    pub fn load(&self) -> Result<Vec<u8>, ConfigError> {
        match self {
            Self::Inline(pem) => Ok(pem.as_bytes().to_vec()),
            Self::File(path) => std::fs::read(path).map_err(|e| ConfigError::KeyFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(<redacted>)"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Values that shape every issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerConfig {
    /// `iss` claim
    pub issuer: String,
    /// `aud` claim
    pub audience: String,
    /// Optional subject to impersonate (`sub` and `prn`)
    pub subject: Option<String>,
    /// Key identifier hint. Informational only; never placed in the header.
    pub key_id: Option<String>,
    /// Token lifetime; zero omits `exp`
    pub expires: Duration,
}

impl IssuerConfig {
    #[must_use]
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            subject: None,
            key_id: None,
            expires: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into()).filter(|s: &String| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into()).filter(|s: &String| !s.is_empty());
        self
    }

    #[must_use]
    pub const fn with_expires(mut self, expires: Duration) -> Self {
        self.expires = expires;
        self
    }
}

/// Token issuer service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Drain period after a shutdown signal
    pub shutdown_timeout: Duration,

    // Token settings
    /// Claims configuration
    pub issuer: IssuerConfig,
    /// Signing key location
    pub key_source: KeySource,

    // Authentication
    /// Authenticator selection
    pub auth_mode: AuthMode,
    /// Entries for [`AuthMode::Static`]
    pub credentials: Vec<CredentialEntry>,

    // Logging
    /// Default tracing filter
    pub log_level: String,
    /// JSON log output
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let issuer = IssuerConfig {
            issuer: var("JWT_ISSUER", "token-issuer"),
            audience: var("JWT_AUDIENCE", "http://localhost:12321/v1/jwt"),
            subject: optional("JWT_SUBJECT"),
            key_id: optional("JWT_PRIVATE_KEY_ID"),
            expires: Duration::from_secs(parse_var(&lookup, "JWT_EXPIRES_SECS", 3600)?),
        };

        let key_source = match (optional("JWT_PRIVATE_KEY"), optional("JWT_PRIVATE_KEY_PATH")) {
            (Some(pem), _) => KeySource::Inline(pem),
            (None, Some(path)) => KeySource::File(PathBuf::from(path)),
            (None, None) => {
                return Err(ConfigError::MissingRequired(
                    "JWT_PRIVATE_KEY or JWT_PRIVATE_KEY_PATH".to_string(),
                ))
            }
        };

        let config = Self {
            host: var("HOST", "0.0.0.0"),
            port: parse_var(&lookup, "PORT", 12321)?,
            shutdown_timeout: Duration::from_secs(parse_var(&lookup, "SHUTDOWN_TIMEOUT", 30)?),
            issuer,
            key_source,
            auth_mode: parse_var(&lookup, "AUTH_MODE", AuthMode::Static)?,
            credentials: parse_credentials(&var("AUTH_CREDENTIALS", ""))?,
            log_level: var("LOG_LEVEL", "info"),
            log_json: parse_var(&lookup, "LOG_JSON", false)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(invalid("PORT", "must be between 1 and 65535"));
        }
        if self.issuer.issuer.trim().is_empty() {
            return Err(invalid("JWT_ISSUER", "must not be empty"));
        }
        if self.issuer.audience.trim().is_empty() {
            return Err(invalid("JWT_AUDIENCE", "must not be empty"));
        }
        Ok(())
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse variable with default value.
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(name) {
        Some(val) => val.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Parse `name` / `name:sha256hex` entries, comma separated.
fn parse_credentials(raw: &str) -> Result<Vec<CredentialEntry>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            None => Ok(CredentialEntry::name_only(entry)),
            Some((name, digest_hex)) => {
                let digest: [u8; 32] = hex::decode(digest_hex.trim())
                    .ok()
                    .and_then(|bytes| bytes.try_into().ok())
                    .ok_or_else(|| {
                        invalid(
                            "AUTH_CREDENTIALS",
                            &format!("entry '{name}' needs a 64 hex digit SHA-256 digest"),
                        )
                    })?;
                Ok(CredentialEntry::with_password_digest(name.trim(), digest))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_utils::fixtures::{sha256_hex, RSA_2048_PKCS1_PEM};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("JWT_PRIVATE_KEY", RSA_2048_PKCS1_PEM)])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 12321);
        assert_eq!(config.issuer.issuer, "token-issuer");
        assert_eq!(config.issuer.expires, Duration::from_secs(3600));
        assert_eq!(config.issuer.subject, None);
        assert_eq!(config.auth_mode, AuthMode::Static);
        assert!(config.credentials.is_empty());
        assert!(!config.log_json);
        assert_eq!(config.bind_address(), "0.0.0.0:12321");
    }

    #[test]
    fn test_missing_key_source() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }

    #[test]
    fn test_inline_key_wins_over_path() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_PRIVATE_KEY", "pem"),
            ("JWT_PRIVATE_KEY_PATH", "/etc/key.pem"),
        ]))
        .unwrap();
        assert_eq!(config.key_source, KeySource::Inline("pem".to_string()));
        assert_eq!(format!("{:?}", config.key_source), "Inline(<redacted>)");
    }

    #[test]
    fn test_key_path() {
        let path = "/nonexistent/token-issuer/key.pem";
        let config = Config::from_lookup(lookup(&[("JWT_PRIVATE_KEY_PATH", path)])).unwrap();
        assert_eq!(config.key_source, KeySource::File(PathBuf::from(path)));
        assert!(matches!(config.key_source.load(), Err(ConfigError::KeyFile { .. })));
    }

    #[test]
    fn test_token_settings() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_PRIVATE_KEY", "pem"),
            ("JWT_ISSUER", "svc@example.com"),
            ("JWT_AUDIENCE", "https://auth.example.com/token"),
            ("JWT_SUBJECT", "alice@example.com"),
            ("JWT_PRIVATE_KEY_ID", "kid-1"),
            ("JWT_EXPIRES_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.issuer.issuer, "svc@example.com");
        assert_eq!(config.issuer.audience, "https://auth.example.com/token");
        assert_eq!(config.issuer.subject.as_deref(), Some("alice@example.com"));
        assert_eq!(config.issuer.key_id.as_deref(), Some("kid-1"));
        assert_eq!(config.issuer.expires, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values() {
        let bad_port = Config::from_lookup(lookup(&[("JWT_PRIVATE_KEY", "pem"), ("PORT", "0")]));
        assert!(matches!(bad_port, Err(ConfigError::InvalidValue { .. })));

        let bad_number = Config::from_lookup(lookup(&[("JWT_PRIVATE_KEY", "pem"), ("PORT", "http")]));
        assert!(matches!(bad_number, Err(ConfigError::ParseError { .. })));

        let empty_issuer = Config::from_lookup(lookup(&[("JWT_PRIVATE_KEY", "pem"), ("JWT_ISSUER", " ")]));
        assert!(matches!(empty_issuer, Err(ConfigError::InvalidValue { .. })));

        let bad_mode = Config::from_lookup(lookup(&[("JWT_PRIVATE_KEY", "pem"), ("AUTH_MODE", "maybe")]));
        assert!(matches!(bad_mode, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_auth_mode_parsing() {
        assert_eq!("static".parse::<AuthMode>().unwrap(), AuthMode::Static);
        assert_eq!("Allow-All".parse::<AuthMode>().unwrap(), AuthMode::AllowAll);
        assert_eq!("deny-all".parse::<AuthMode>().unwrap(), AuthMode::DenyAll);
        assert!("open".parse::<AuthMode>().is_err());
    }

    #[test]
    fn test_credentials_parsing() {
        let digest = sha256_hex("s3cret");
        let raw = format!("hukp, alice:{digest} ,,");
        let entries = parse_credentials(&raw).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], CredentialEntry::name_only("hukp"));
        assert_eq!(entries[1], CredentialEntry::with_password("alice", "s3cret"));
    }

    #[test]
    fn test_credentials_bad_digest() {
        assert!(parse_credentials("alice:abcd").is_err());
        assert!(parse_credentials("alice:zz").is_err());
    }

    #[test]
    fn test_issuer_config_builders() {
        let config = IssuerConfig::new("i", "a")
            .with_subject("")
            .with_key_id("")
            .with_expires(Duration::from_secs(5));
        assert_eq!(config.subject, None);
        assert_eq!(config.key_id, None);
        assert_eq!(config.expires, Duration::from_secs(5));
    }
}
