//! Tracks the last certificate deployed from this host

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::tls::{are_equivalent, parse_certificate, ParsedCertificate};

/// Whether `current` is the certificate recorded at `path`.
///
/// A missing record means nothing was deployed yet.
pub fn is_unchanged(path: &Path, current: &ParsedCertificate) -> Result<bool> {
    let pem = match fs::read_to_string(path) {
        Ok(pem) => pem,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No previous certificate at {}", path.display());
            return Ok(false);
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read previous certificate: {}", path.display())
            })
        }
    };

    let previous = parse_certificate(&pem)
        .with_context(|| format!("Failed to parse previous certificate: {}", path.display()))?;

    Ok(are_equivalent(current, &previous))
}

/// Store `certificate_pem` at `path` as the last deployed certificate
pub fn record_deployed(path: &Path, certificate_pem: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, certificate_pem)
        .with_context(|| format!("Failed to write previous certificate: {}", path.display()))?;

    info!("Recorded deployed certificate at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXAMPLE_CERT: &str = include_str!("../../tests/fixtures/example.com.crt");
    const RESERIAL_CERT: &str = include_str!("../../tests/fixtures/example.com.reserial.crt");

    #[test]
    fn test_missing_record_is_changed() {
        let dir = TempDir::new().unwrap();
        let current = parse_certificate(EXAMPLE_CERT).unwrap();

        assert!(!is_unchanged(&dir.path().join("previous.crt"), &current).unwrap());
    }

    #[test]
    fn test_record_then_compare() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state/previous.crt");
        let current = parse_certificate(EXAMPLE_CERT).unwrap();

        record_deployed(&path, EXAMPLE_CERT).unwrap();
        assert!(is_unchanged(&path, &current).unwrap());

        let renewed = parse_certificate(RESERIAL_CERT).unwrap();
        assert!(!is_unchanged(&path, &renewed).unwrap());

        record_deployed(&path, RESERIAL_CERT).unwrap();
        assert!(is_unchanged(&path, &renewed).unwrap());
        assert!(!is_unchanged(&path, &current).unwrap());
    }

    #[test]
    fn test_garbage_record_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("previous.crt");
        fs::write(&path, "not a certificate").unwrap();
        let current = parse_certificate(EXAMPLE_CERT).unwrap();

        assert!(is_unchanged(&path, &current).is_err());
    }
}
