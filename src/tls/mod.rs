//! Certificate identity and private key handling

pub mod identity;
pub mod keys;

pub use identity::{are_equivalent, parse_certificate, pem_equivalent, ParsedCertificate};
pub use keys::{
    detect_private_key, parse_private_key, serialize_private_key, KeyKind, PrivateKey,
};
