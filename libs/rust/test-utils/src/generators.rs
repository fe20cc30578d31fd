//! Shared proptest generators for token issuance tests.

use proptest::prelude::*;

/// Generate principal names. Never empty.
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9._-]{0,31}"
}

/// Generate passwords, including the empty password.
pub fn password_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,48}"
}

/// Generate a single scope action.
pub fn action_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("read".to_string()),
        Just("write".to_string()),
        Just("delete".to_string()),
        Just("push".to_string()),
        Just("pull".to_string()),
        "[a-z][a-z:_*]{0,15}",
    ]
}

/// Generate action lists. Order matters and duplicates are allowed.
pub fn actions_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(action_strategy(), 0..8)
}

/// Generate resource names.
pub fn resource_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9/_.-]{0,40}"
}

/// Generate issuer identities (service account style emails or names).
pub fn issuer_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{3,12}@[a-z]{3,10}\\.(com|io|dev)",
        "[a-z][a-z0-9-]{2,30}",
    ]
}

/// Generate subjects to impersonate; empty means "no subject".
pub fn subject_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z0-9@._-]{1,40}"]
}

/// Generate token lifetimes in seconds, including zero ("no expiry").
pub fn expiry_secs_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), 1u64..=86_400u64]
}
