use anyhow::anyhow;
use tracing::info;

use crate::error::DeployError;
use crate::provider::{CdnCertificateApi, UploadCertificateRequest};

const ALIAS_SUFFIX_LEN: usize = 6;

/// Short random lowercase alphanumeric string.
///
/// Only used to tell aliases apart, so a v4 UUID is a good enough source.
pub fn random_suffix(len: usize) -> String {
    uuid::Uuid::new_v4().simple().to_string().chars().take(len).collect()
}

/// Certificate alias: the seed plus a random suffix
pub fn certificate_alias(seed: &str) -> String {
    format!("{}_{}", seed, random_suffix(ALIAS_SUFFIX_LEN))
}

/// Upload a certificate/key pair and return the provider's certificate id.
///
/// Every call creates a new certificate object on the provider side.
pub async fn upload_certificate(
    api: &dyn CdnCertificateApi,
    certificate_pem: &str,
    private_key_pem: &str,
    alias_seed: &str,
) -> Result<String, DeployError> {
    let alias = certificate_alias(alias_seed);

    info!("Uploading certificate to {} as {}", api.provider_name(), alias);

    let response = api
        .upload_certificate(UploadCertificateRequest {
            certificate_public_key: certificate_pem.to_string(),
            certificate_private_key: private_key_pem.to_string(),
            alias,
            repeatable: false,
        })
        .await
        .map_err(DeployError::Upload)?;

    response
        .certificate_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| DeployError::Upload(anyhow!("response has no CertificateId")))
}
