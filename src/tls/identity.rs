//! Certificate identity: parse PEM certificates and decide whether two
//! certificates are the same one for deployment-skip purposes

use chrono::{DateTime, Utc};
use std::io::BufReader;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::prelude::{X509Certificate, X509Name};

use crate::error::CertificateError;

/// OID of the X.520 `serialNumber` name attribute
const SERIAL_NUMBER_ATTR_OID: &str = "2.5.4.5";

/// Structured view of an X.509 certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCertificate {
    /// Raw signature bytes
    pub signature: Vec<u8>,
    /// Signature algorithm OID in dotted form
    pub signature_algorithm: String,
    /// Certificate serial number in decimal
    pub serial_number: String,
    /// `serialNumber` attribute of the issuer name, if any
    pub issuer_serial_number: Option<String>,
    /// `serialNumber` attribute of the subject name, if any
    pub subject_serial_number: Option<String>,
    /// Common name and DNS subject alternative names, sorted and deduplicated
    pub domains: Vec<String>,
    /// When this certificate expires
    pub not_after: DateTime<Utc>,
}

impl ParsedCertificate {
    pub fn is_expired(&self) -> bool {
        self.not_after <= Utc::now()
    }
}

/// Parse the first certificate in a PEM bundle
pub fn parse_certificate(pem: &str) -> Result<ParsedCertificate, CertificateError> {
    let mut reader = BufReader::new(pem.as_bytes());
    let certs = rustls_pemfile::certs(&mut reader).map_err(|_| CertificateError::MalformedPem)?;

    // Only the end-entity certificate matters; chain certificates are ignored
    let der = certs.into_iter().next().ok_or(CertificateError::MalformedPem)?;

    let (_, x509) = x509_parser::parse_x509_certificate(&der)
        .map_err(|e| CertificateError::MalformedCertificate(e.to_string()))?;

    let not_after = DateTime::from_timestamp(x509.validity().not_after.timestamp(), 0)
        .ok_or_else(|| {
            CertificateError::MalformedCertificate("notAfter is out of range".to_string())
        })?;

    Ok(ParsedCertificate {
        signature: x509.signature_value.data.to_vec(),
        signature_algorithm: x509.signature_algorithm.algorithm.to_id_string(),
        serial_number: x509.tbs_certificate.serial.to_string(),
        issuer_serial_number: name_serial_number(x509.issuer()),
        subject_serial_number: name_serial_number(x509.subject()),
        domains: extract_domains(&x509),
        not_after,
    })
}

/// Whether two certificates are the same certificate.
///
/// Compares signature, signature algorithm, serial number and the issuer and
/// subject `serialNumber` attributes. This is a fast check rather than a full
/// byte comparison; it is sound for certificates issued by a conforming CA.
pub fn are_equivalent(a: &ParsedCertificate, b: &ParsedCertificate) -> bool {
    a.signature == b.signature
        && a.signature_algorithm == b.signature_algorithm
        && a.serial_number == b.serial_number
        && a.issuer_serial_number == b.issuer_serial_number
        && a.subject_serial_number == b.subject_serial_number
}

/// Parse both PEM inputs and compare them
pub fn pem_equivalent(a: &str, b: &str) -> Result<bool, CertificateError> {
    Ok(are_equivalent(&parse_certificate(a)?, &parse_certificate(b)?))
}

fn name_serial_number(name: &X509Name<'_>) -> Option<String> {
    name.iter_attributes()
        .find(|attr| attr.attr_type().to_id_string() == SERIAL_NUMBER_ATTR_OID)
        .and_then(|attr| attr.as_str().ok())
        .map(str::to_string)
}

fn extract_domains(x509: &X509Certificate<'_>) -> Vec<String> {
    let mut domains = Vec::new();

    if let Some(cn) = x509.subject().iter_common_name().next() {
        if let Ok(cn_str) = cn.as_str() {
            domains.push(cn_str.to_string());
        }
    }

    for ext in x509.extensions() {
        if let ParsedExtension::SubjectAlternativeName(san) = ext.parsed_extension() {
            for name in &san.general_names {
                if let GeneralName::DNSName(dns) = name {
                    domains.push(dns.to_string());
                }
            }
        }
    }

    domains.sort();
    domains.dedup();
    domains
}
