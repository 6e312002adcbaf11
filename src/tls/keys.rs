//! PEM private key parsing and encoding for EC (P-256, P-384, P-521) and RSA keys

use p256::pkcs8::{DecodePrivateKey, LineEnding};
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::RsaPrivateKey;
use std::io::BufReader;

use crate::error::CertificateError;

/// Which key family the caller expects the PEM to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Ec,
    Rsa,
}

/// A parsed private key
#[derive(Clone)]
pub enum PrivateKey {
    EcP256(p256::SecretKey),
    EcP384(p384::SecretKey),
    EcP521(p521::SecretKey),
    Rsa(RsaPrivateKey),
}

impl PrivateKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            PrivateKey::EcP256(_) | PrivateKey::EcP384(_) | PrivateKey::EcP521(_) => KeyKind::Ec,
            PrivateKey::Rsa(_) => KeyKind::Rsa,
        }
    }

    /// Short algorithm label for logging
    pub fn algorithm(&self) -> &'static str {
        match self {
            PrivateKey::EcP256(_) => "ECDSA P-256",
            PrivateKey::EcP384(_) => "ECDSA P-384",
            PrivateKey::EcP521(_) => "ECDSA P-521",
            PrivateKey::Rsa(_) => "RSA",
        }
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm())
            .field("key", &"<REDACTED>")
            .finish()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PrivateKey::EcP256(a), PrivateKey::EcP256(b)) => a.to_bytes() == b.to_bytes(),
            (PrivateKey::EcP384(a), PrivateKey::EcP384(b)) => a.to_bytes() == b.to_bytes(),
            (PrivateKey::EcP521(a), PrivateKey::EcP521(b)) => a.to_bytes() == b.to_bytes(),
            (PrivateKey::Rsa(a), PrivateKey::Rsa(b)) => {
                a.n() == b.n() && a.e() == b.e() && a.d() == b.d()
            }
            _ => false,
        }
    }
}

/// PEM block flavours a private key can arrive in
enum KeyBlock {
    Pkcs1(Vec<u8>),
    Sec1(Vec<u8>),
    Pkcs8(Vec<u8>),
}

fn read_key_block(pem: &str) -> Result<KeyBlock, CertificateError> {
    let mut reader = BufReader::new(pem.as_bytes());
    loop {
        match rustls_pemfile::read_one(&mut reader).map_err(|_| CertificateError::MalformedPem)? {
            Some(rustls_pemfile::Item::RSAKey(der)) => return Ok(KeyBlock::Pkcs1(der)),
            Some(rustls_pemfile::Item::ECKey(der)) => return Ok(KeyBlock::Sec1(der)),
            Some(rustls_pemfile::Item::PKCS8Key(der)) => return Ok(KeyBlock::Pkcs8(der)),
            Some(_) => continue,
            None => return Err(CertificateError::MalformedPem),
        }
    }
}

const EC_CURVES: &str = "P-256, P-384 or P-521";

fn ec_from_sec1(der: &[u8]) -> Result<PrivateKey, CertificateError> {
    p256::SecretKey::from_sec1_der(der)
        .map(PrivateKey::EcP256)
        .or_else(|_| p384::SecretKey::from_sec1_der(der).map(PrivateKey::EcP384))
        .or_else(|_| p521::SecretKey::from_sec1_der(der).map(PrivateKey::EcP521))
        .map_err(|_| {
            CertificateError::MalformedPrivateKey(format!("EC key: not a valid {} SEC1 key", EC_CURVES))
        })
}

fn ec_from_pkcs8(der: &[u8]) -> Result<PrivateKey, CertificateError> {
    p256::SecretKey::from_pkcs8_der(der)
        .map(PrivateKey::EcP256)
        .or_else(|_| p384::SecretKey::from_pkcs8_der(der).map(PrivateKey::EcP384))
        .or_else(|_| p521::SecretKey::from_pkcs8_der(der).map(PrivateKey::EcP521))
        .map_err(|_| {
            CertificateError::MalformedPrivateKey(format!("EC key: not a valid {} PKCS#8 key", EC_CURVES))
        })
}

/// Parse a PEM private key of the given kind.
///
/// EC keys may be SEC1 (`EC PRIVATE KEY`) or PKCS#8; RSA keys may be PKCS#1
/// (`RSA PRIVATE KEY`) or PKCS#8.
pub fn parse_private_key(pem: &str, kind: KeyKind) -> Result<PrivateKey, CertificateError> {
    let block = read_key_block(pem)?;

    match (kind, block) {
        (KeyKind::Ec, KeyBlock::Sec1(der)) => ec_from_sec1(&der),
        (KeyKind::Ec, KeyBlock::Pkcs8(der)) => ec_from_pkcs8(&der),
        (KeyKind::Rsa, KeyBlock::Pkcs1(der)) => RsaPrivateKey::from_pkcs1_der(&der)
            .map(PrivateKey::Rsa)
            .map_err(|e| CertificateError::MalformedPrivateKey(format!("RSA key: {}", e))),
        (KeyKind::Rsa, KeyBlock::Pkcs8(der)) => RsaPrivateKey::from_pkcs8_der(&der)
            .map(PrivateKey::Rsa)
            .map_err(|e| CertificateError::MalformedPrivateKey(format!("RSA key: {}", e))),
        (KeyKind::Ec, KeyBlock::Pkcs1(_)) => Err(CertificateError::MalformedPrivateKey(
            "expected an EC key, found an RSA PRIVATE KEY block".to_string(),
        )),
        (KeyKind::Rsa, KeyBlock::Sec1(_)) => Err(CertificateError::MalformedPrivateKey(
            "expected an RSA key, found an EC PRIVATE KEY block".to_string(),
        )),
    }
}

/// Parse a private key without knowing its kind up front (tries RSA, then EC)
pub fn detect_private_key(pem: &str) -> Result<PrivateKey, CertificateError> {
    match parse_private_key(pem, KeyKind::Rsa) {
        Ok(key) => Ok(key),
        Err(CertificateError::MalformedPem) => Err(CertificateError::MalformedPem),
        Err(_) => parse_private_key(pem, KeyKind::Ec).map_err(|_| {
            CertificateError::MalformedPrivateKey(format!(
                "unsupported key: neither RSA nor EC {}",
                EC_CURVES
            ))
        }),
    }
}

/// Encode a private key as PEM: SEC1 for EC keys, PKCS#1 for RSA keys
pub fn serialize_private_key(key: &PrivateKey) -> Result<String, CertificateError> {
    let pem = match key {
        PrivateKey::EcP256(k) => k
            .to_sec1_pem(LineEnding::LF)
            .map_err(|e| CertificateError::Serialize(e.to_string()))?,
        PrivateKey::EcP384(k) => k
            .to_sec1_pem(LineEnding::LF)
            .map_err(|e| CertificateError::Serialize(e.to_string()))?,
        PrivateKey::EcP521(k) => k
            .to_sec1_pem(LineEnding::LF)
            .map_err(|e| CertificateError::Serialize(e.to_string()))?,
        PrivateKey::Rsa(k) => k
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| CertificateError::Serialize(e.to_string()))?,
    };

    Ok(pem.to_string())
}
