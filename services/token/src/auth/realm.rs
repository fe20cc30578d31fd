//! Request payload: who is asking, and for what.

use crate::error::TokenError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decoded request payload.
///
/// Every field is optional on the wire. An empty or partial payload decodes
/// to empty values rather than failing, so callers must not read a
/// successfully decoded realm as a populated one.
#[derive(Debug, Default, Deserialize)]
pub struct Realm {
    #[serde(default, deserialize_with = "nullable")]
    pub credential: Credential,
    #[serde(default, deserialize_with = "nullable")]
    pub scope: Scope,
}

#[derive(Debug, Deserialize)]
pub struct Credential {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// Never logged; `Debug` prints it redacted.
    #[serde(default = "empty_secret", deserialize_with = "nullable_secret")]
    pub password: SecretString,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Scope {
    #[serde(default, deserialize_with = "nullable")]
    pub resource: String,
    /// Requested actions, in request order. Duplicates are kept.
    #[serde(default, deserialize_with = "nullable")]
    pub actions: Vec<String>,
}

impl Credential {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Credential {
            name: name.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Both name and password empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.password.expose_secret().is_empty()
    }
}

impl Default for Credential {
    fn default() -> Self {
        Credential {
            name: String::new(),
            password: empty_secret(),
        }
    }
}

impl Realm {
    pub fn new(credential: Credential, scope: Scope) -> Self {
        Realm { credential, scope }
    }

    /// No credential and no scope at all.
    pub fn is_empty(&self) -> bool {
        self.credential.is_empty() && self.scope.resource.is_empty() && self.scope.actions.is_empty()
    }
}

/// Decode a realm from a request body.
///
/// Only the first JSON value is read. An empty body and a JSON `null` both
/// yield an all-empty realm.
///
/// # Errors
///
/// [`TokenError::MalformedRequest`] if the body is not valid JSON of the
/// expected shape.
pub fn decode_realm(body: &[u8]) -> Result<Realm, TokenError> {
    let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Option<Value>>();
    let value = match values.next() {
        None | Some(Ok(None)) => return Ok(Realm::default()),
        Some(Ok(Some(value))) => value,
        Some(Err(e)) => return Err(TokenError::malformed(format!("invalid realm JSON: {e}"))),
    };

    // serde's derived visitors also take sequences; the wire shape is objects only.
    if !value.is_object() {
        return Err(TokenError::malformed("realm must be a JSON object"));
    }
    for field in ["credential", "scope"] {
        if value.get(field).is_some_and(|v| !v.is_object() && !v.is_null()) {
            return Err(TokenError::malformed(format!("'{field}' must be a JSON object")));
        }
    }

    Realm::deserialize(value).map_err(|e| TokenError::malformed(format!("invalid realm JSON: {e}")))
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map_or_else(empty_secret, SecretString::from))
}
