//! Deployment input and provider credential types

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifies the stored access record a credential came from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccessRecord {
    pub id: String,
    pub name: String,
}

/// An issued certificate and its private key, both PEM-encoded
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CertificateBundle {
    pub certificate: String,
    pub private_key: String,
}

impl std::fmt::Debug for CertificateBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateBundle")
            .field("certificate", &format!("<{} bytes>", self.certificate.len()))
            .field("private_key", &"<REDACTED>")
            .finish()
    }
}

/// Free-form deploy settings keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    pub config: HashMap<String, serde_json::Value>,
}

impl DeployConfig {
    /// String value for `key`, or an empty string when absent or not a string
    pub fn get_string(&self, key: &str) -> String {
        self.config
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

/// Input to one deployment attempt
#[derive(Debug, Clone)]
pub struct DeployerOption {
    pub access_record: AccessRecord,
    /// Provider credential as a JSON blob
    pub access: String,
    /// Domain the certificate was issued for
    pub domain: String,
    pub certificate: CertificateBundle,
    pub deploy_config: DeployConfig,
}

impl DeployerOption {
    pub fn get_deploy_string(&self, key: &str) -> String {
        self.deploy_config.get_string(key)
    }
}

/// Tencent Cloud API credential
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TencentAccess {
    pub secret_id: String,
    pub secret_key: String,
}

impl std::fmt::Debug for TencentAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TencentAccess")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<REDACTED>")
            .finish()
    }
}

impl TencentAccess {
    /// Decode and validate a credential blob
    pub fn from_json(json: &str) -> Result<Self> {
        let access: TencentAccess =
            serde_json::from_str(json).context("Failed to unmarshal tencent access")?;

        if access.secret_id.trim().is_empty() {
            bail!("tencent access is missing secretId");
        }
        if access.secret_key.trim().is_empty() {
            bail!("tencent access is missing secretKey");
        }

        Ok(access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_access() {
        let access = TencentAccess::from_json(r#"{"secretId":"AKID","secretKey":"key"}"#).unwrap();
        assert_eq!(access.secret_id, "AKID");
        assert_eq!(access.secret_key, "key");
    }

    #[test]
    fn test_decode_access_missing_field() {
        assert!(TencentAccess::from_json(r#"{"secretId":"AKID"}"#).is_err());
    }

    #[test]
    fn test_decode_access_empty_field() {
        assert!(TencentAccess::from_json(r#"{"secretId":"AKID","secretKey":" "}"#).is_err());
    }

    #[test]
    fn test_decode_access_malformed() {
        assert!(TencentAccess::from_json("not json").is_err());
    }

    #[test]
    fn test_get_deploy_string() {
        let mut config = HashMap::new();
        config.insert("domain".to_string(), serde_json::json!("*.example.com"));
        config.insert("port".to_string(), serde_json::json!(443));
        let deploy_config = DeployConfig { config };

        assert_eq!(deploy_config.get_string("domain"), "*.example.com");
        assert_eq!(deploy_config.get_string("port"), "");
        assert_eq!(deploy_config.get_string("missing"), "");
    }
}
