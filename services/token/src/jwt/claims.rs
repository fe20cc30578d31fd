use serde::{Deserialize, Serialize};

/// JOSE header. One value for the lifetime of the process.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Header {
    pub alg: &'static str,
    pub typ: &'static str,
}

impl Header {
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    pub const RS256: Header = Header {
        alg: "RS256",
        typ: "JWT",
    };
}

/// Claims carried by an issued token.
///
/// Field order is the serialization order and must not change: some
/// consumers compare encoded segments literally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimSet {
    pub iss: String,
    /// Space-joined actions, verbatim order.
    pub scope: String,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Legacy name of `sub`, still read by older OAuth 2.0 consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prn: Option<String>,
}

impl ClaimSet {
    pub fn new(iss: String, scope: String, aud: String, iat: i64) -> Self {
        ClaimSet {
            iss,
            scope,
            aud,
            exp: None,
            iat,
            sub: None,
            prn: None,
        }
    }

    /// Sets `sub` and `prn` together; they always agree.
    pub fn with_subject(mut self, subject: String) -> Self {
        self.prn = Some(subject.clone());
        self.sub = Some(subject);
        self
    }

    pub fn with_expiry(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }
}
