use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::deployer::{AccessRecord, CertificateBundle, DeployConfig, DeployerOption};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    pub access: AccessConfig,
    pub deploy: DeploySection,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_output")]
    pub output: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "text".to_string() }
fn default_log_output() -> String { "console".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            output: default_log_output(),
            file_path: None,
        }
    }
}

/// Where and how to reach the provider APIs
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_ssl_endpoint")]
    pub ssl_endpoint: String,
    #[serde(default = "default_cdn_endpoint")]
    pub cdn_endpoint: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

fn default_ssl_endpoint() -> String { "ssl.tencentcloudapi.com".to_string() }
fn default_cdn_endpoint() -> String { "cdn.tencentcloudapi.com".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_scheme() -> String { "https".to_string() }

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            ssl_endpoint: default_ssl_endpoint(),
            cdn_endpoint: default_cdn_endpoint(),
            region: None,
            timeout_secs: default_timeout_secs(),
            scheme: default_scheme(),
        }
    }
}

/// Access record the credential belongs to
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AccessConfig {
    pub name: String,
    pub id: String,
    /// JSON credential blob, e.g. `{"secretId":"...","secretKey":"..."}`
    pub credential: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeploySection {
    /// Domain the certificate was issued for
    pub domain: String,
    pub certificate_path: String,
    pub private_key_path: String,
    /// Last deployed certificate, used to skip redundant deployments
    #[serde(default)]
    pub previous_certificate_path: Option<String>,
    /// Provider-specific deploy settings; `domain` holds the CDN domain spec
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
}

impl Config {
    /// Read the certificate files and assemble the deployer input
    pub fn deployer_option(&self) -> Result<DeployerOption> {
        let certificate = std::fs::read_to_string(&self.deploy.certificate_path).with_context(|| {
            format!("Failed to read certificate file: {}", self.deploy.certificate_path)
        })?;
        let private_key = std::fs::read_to_string(&self.deploy.private_key_path).with_context(|| {
            format!("Failed to read key file: {}", self.deploy.private_key_path)
        })?;

        Ok(DeployerOption {
            access_record: AccessRecord {
                id: self.access.id.clone(),
                name: self.access.name.clone(),
            },
            access: self.access.credential.clone(),
            domain: self.deploy.domain.clone(),
            certificate: CertificateBundle { certificate, private_key },
            deploy_config: DeployConfig {
                config: self.deploy.config.clone(),
            },
        })
    }
}

pub fn load_config(path: &str) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path))?;
    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.access.name.trim().is_empty() || config.access.id.trim().is_empty() {
        bail!("access.name and access.id must not be empty");
    }

    if config.deploy.domain.trim().is_empty() {
        bail!("deploy.domain must not be empty");
    }

    match config.deploy.config.get("domain").and_then(|v| v.as_str()) {
        Some(domain) if !domain.trim().is_empty() => {}
        _ => bail!("deploy.config.domain must be set to the CDN domain to deploy to"),
    }

    if config.provider.timeout_secs == 0 {
        bail!("provider.timeout_secs must be greater than zero");
    }

    if config.provider.scheme != "https" && config.provider.scheme != "http" {
        bail!("Invalid provider.scheme: {}", config.provider.scheme);
    }

    Ok(())
}
