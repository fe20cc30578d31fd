pub mod builder;
pub mod claims;
pub mod issuer;
pub mod key;
pub mod serializer;
pub mod signer;

pub use builder::{build_claims, ClaimSetBuilder};
pub use claims::{ClaimSet, Header};
pub use issuer::TokenIssuer;
pub use key::{parse_key, SigningKey};
pub use serializer::CompactSerializer;
pub use signer::{JwtSigner, RsaSigner};
